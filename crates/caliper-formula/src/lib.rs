//! # caliper-formula
//!
//! **Tier 2 (Aggregation)**
//!
//! The Formula/Counter protocol: a formula creates one counter per component,
//! counters are seeded on leaves from raw measures, merged bottom-up into
//! their parent's counter, and turned into measures on every component.
//!
//! ## What belongs here
//! * `Formula` and `Counter` traits, their contexts
//! * `FormulaExecutor`, the path-aware visitor running formulas
//! * Built-in formulas (sums, distributions, averages, densities, coverage)
//! * `PeriodValues`, per-period accumulators for variation-aware counters
//!
//! ## What does NOT belong here
//! * New-code formulas needing SCM data or issues (see `caliper-variation`)
//! * Choosing which formulas run in which pass (see `caliper-core`)
//!
//! ## Example
//! ```
//! use caliper_component::{Component, ComponentType};
//! use caliper_formula::{FormulaExecutor, SumFormula, boxed};
//! use caliper_measure::Measure;
//! use caliper_metric::{MetricCatalog, core_metrics, keys};
//! use caliper_repository::MeasureRepository;
//!
//! let file = Component::builder(ComponentType::File, 2).build();
//! let root = Component::builder(ComponentType::Project, 1).child(file.clone()).build();
//! let catalog = core_metrics();
//! let mut repository = MeasureRepository::new();
//! repository.add(&file, catalog.get_by_key(keys::NCLOC)?, Measure::int(10))?;
//!
//! FormulaExecutor::builder(&catalog, &mut repository)
//!     .build_for([boxed(SumFormula::int(keys::NCLOC))])?
//!     .visit(&root)?;
//!
//! assert_eq!(repository.get_raw_measure(&root, keys::NCLOC), Some(&Measure::int(10)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod context;
mod executor;
mod formulas;
mod period_values;

use std::any::Any;

use caliper_component::ComponentRef;
use caliper_measure::Measure;
use caliper_measure::key_value::KeyValueError;
use caliper_metric::MetricError;
use caliper_repository::RepositoryError;
use thiserror::Error;

pub use context::{CounterInitializationContext, CreateMeasureContext};
pub use executor::{FormulaExecutor, FormulaExecutorBuilder};
pub use formulas::{
    AverageFormula, AverageFormulaBuilder, ComplementDensityFormula, DensityFormula,
    DistributionFormula, DuplicationDensityFormula, FileCountFormula,
    LinesAndConditionsCoverageFormula, SingleWithUncoveredFormula, SumFormula, Summable,
    VariationSumFormula,
};
pub use period_values::PeriodValues;

/// Errors raised while running formulas.
#[derive(Debug, Error)]
pub enum FormulaError {
    #[error("Counter of formula [{formula}] is missing or has an unexpected type on component {component}")]
    UnknownCounter {
        formula: String,
        component: ComponentRef,
    },

    #[error("Invalid data in measure '{metric}' of component {component}: {source}")]
    InvalidData {
        component: ComponentRef,
        metric: String,
        #[source]
        source: KeyValueError,
    },

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A per-component accumulator.
///
/// `aggregate` must be associative and commutative: the result of merging
/// children never depends on their order.
pub trait Counter: 'static {
    /// Seed the counter from a leaf's raw measures.
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError>;

    /// Merge a child's counter into this one.
    fn aggregate(&mut self, other: &Self);
}

/// Computes measures of one or more output metrics from a counter.
pub trait Formula {
    type Counter: Counter;

    fn create_new_counter(&self) -> Self::Counter;

    /// Seed a leaf counter. Formulas holding collaborators (SCM data, issues)
    /// override this to hand them to the counter.
    fn initialize_counter(
        &self,
        counter: &mut Self::Counter,
        context: &CounterInitializationContext<'_>,
    ) -> Result<(), FormulaError> {
        counter.initialize(context)
    }

    /// Whether non-leaf components are seeded too, for inputs attached to
    /// any component. Their counter already holds the children's merge when
    /// `initialize_counter` runs on them.
    fn seeds_every_component(&self) -> bool {
        false
    }

    /// Measure of `context.metric()` for `context.component()`, if any.
    fn create_measure(
        &self,
        counter: &Self::Counter,
        context: &CreateMeasureContext<'_>,
    ) -> Option<Measure>;

    fn output_metric_keys(&self) -> Vec<&str>;
}

/// Object-safe view of any [`Formula`], implemented for all of them.
pub trait AnyFormula {
    fn new_counter(&self) -> Box<dyn Any>;

    #[doc(hidden)]
    fn initialize_any(
        &self,
        counter: &mut dyn Any,
        context: &CounterInitializationContext<'_>,
    ) -> Result<Result<(), FormulaError>, CounterMismatchError>;

    #[doc(hidden)]
    fn aggregate_any(&self, into: &mut dyn Any, from: &dyn Any) -> Result<(), CounterMismatchError>;

    #[doc(hidden)]
    fn create_measure_any(
        &self,
        counter: &dyn Any,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>, CounterMismatchError>;

    fn output_keys(&self) -> Vec<&str>;

    fn seeds_any_component(&self) -> bool;
}

/// Returned by [`AnyFormula`] when a counter is not the formula's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterMismatchError;

impl<F: Formula> AnyFormula for F {
    fn new_counter(&self) -> Box<dyn Any> {
        Box::new(self.create_new_counter())
    }

    fn initialize_any(
        &self,
        counter: &mut dyn Any,
        context: &CounterInitializationContext<'_>,
    ) -> Result<Result<(), FormulaError>, CounterMismatchError> {
        let counter = counter
            .downcast_mut::<F::Counter>()
            .ok_or(CounterMismatchError)?;
        Ok(self.initialize_counter(counter, context))
    }

    fn aggregate_any(&self, into: &mut dyn Any, from: &dyn Any) -> Result<(), CounterMismatchError> {
        let from = from.downcast_ref::<F::Counter>().ok_or(CounterMismatchError)?;
        let into = into
            .downcast_mut::<F::Counter>()
            .ok_or(CounterMismatchError)?;
        into.aggregate(from);
        Ok(())
    }

    fn create_measure_any(
        &self,
        counter: &dyn Any,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>, CounterMismatchError> {
        let counter = counter
            .downcast_ref::<F::Counter>()
            .ok_or(CounterMismatchError)?;
        Ok(self.create_measure(counter, context))
    }

    fn output_keys(&self) -> Vec<&str> {
        self.output_metric_keys()
    }

    fn seeds_any_component(&self) -> bool {
        self.seeds_every_component()
    }
}

/// A formula ready to be handed to a [`FormulaExecutor`].
pub type BoxedFormula<'a> = Box<dyn AnyFormula + 'a>;

/// Box a formula for [`FormulaExecutorBuilder::build_for`].
pub fn boxed<'a, F: Formula + 'a>(formula: F) -> BoxedFormula<'a> {
    Box::new(formula)
}
