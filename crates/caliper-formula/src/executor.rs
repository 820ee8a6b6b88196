use std::any::Any;

use caliper_component::{Component, ComponentRef};
use caliper_crawler::{Order, Path, PathAwareVisitor, crawl_with_path};
use caliper_metric::{Metric, MetricCatalog};
use caliper_period::{Period, PeriodsHolder};
use caliper_repository::MeasureRepository;
use tracing::debug;

use crate::context::{CounterInitializationContext, CreateMeasureContext};
use crate::{AnyFormula, BoxedFormula, FormulaError};

/// Configures a [`FormulaExecutor`].
pub struct FormulaExecutorBuilder<'a> {
    catalog: &'a dyn MetricCatalog,
    repository: &'a mut MeasureRepository,
    periods: &'a [Period],
}

impl<'a> FormulaExecutorBuilder<'a> {
    /// Expose the analysis periods to counters and measure contexts.
    #[must_use]
    pub fn with_variation_support(mut self, periods: &'a PeriodsHolder) -> Self {
        self.periods = periods.periods();
        self
    }

    /// Resolve every output metric up front; an unknown key fails here,
    /// before any component is visited.
    pub fn build_for<I>(self, formulas: I) -> Result<FormulaExecutor<'a>, FormulaError>
    where
        I: IntoIterator<Item = BoxedFormula<'a>>,
    {
        let formulas: Vec<BoxedFormula<'a>> = formulas.into_iter().collect();
        let outputs = formulas
            .iter()
            .map(|formula| {
                formula
                    .output_keys()
                    .into_iter()
                    .map(|key| self.catalog.get_by_key(key).cloned())
                    .collect::<Result<Vec<Metric>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FormulaExecutor {
            repository: self.repository,
            periods: self.periods,
            formulas,
            outputs,
        })
    }
}

/// Runs a set of formulas over a component tree in one post-order pass.
///
/// Leaf counters are seeded from raw measures, as are the counters of other
/// components for formulas that seed every component. Every component's counter is
/// merged into its parent's before the walk leaves it, and each output metric
/// gets a measure wherever the formula produces one.
pub struct FormulaExecutor<'a> {
    repository: &'a mut MeasureRepository,
    periods: &'a [Period],
    formulas: Vec<BoxedFormula<'a>>,
    outputs: Vec<Vec<Metric>>,
}

impl<'a> FormulaExecutor<'a> {
    pub fn builder(
        catalog: &'a dyn MetricCatalog,
        repository: &'a mut MeasureRepository,
    ) -> FormulaExecutorBuilder<'a> {
        FormulaExecutorBuilder {
            catalog,
            repository,
            periods: &[],
        }
    }

    pub fn visit(&mut self, root: &Component) -> Result<(), FormulaError> {
        debug!(
            formulas = self.formulas.len(),
            periods = self.periods.len(),
            root = root.reference,
            "running formulas"
        );
        crawl_with_path(root, self)
    }

    /// Seed every counter of a leaf, and on other components the counters
    /// of formulas that ask for it.
    fn initialize_counters(
        &self,
        component: &Component,
        counters: &mut Counters,
    ) -> Result<(), FormulaError> {
        let leaf = component.is_leaf();
        let context = CounterInitializationContext::new(component, &*self.repository, self.periods);
        for (index, formula) in self.formulas.iter().enumerate() {
            if !leaf && !formula.seeds_any_component() {
                continue;
            }
            let counter = counters.slots[index].get_or_insert_with(|| formula.new_counter());
            formula
                .initialize_any(&mut **counter, &context)
                .map_err(|_| unknown_counter(formula.as_ref(), component.reference))??;
        }
        Ok(())
    }

    fn create_measures(
        &mut self,
        component: &Component,
        counters: &mut Counters,
    ) -> Result<(), FormulaError> {
        for (index, formula) in self.formulas.iter().enumerate() {
            let counter = counters.slots[index].get_or_insert_with(|| formula.new_counter());
            for metric in &self.outputs[index] {
                let context = CreateMeasureContext::new(component, metric, self.periods);
                let measure = formula
                    .create_measure_any(&**counter, &context)
                    .map_err(|_| unknown_counter(formula.as_ref(), component.reference))?;
                if let Some(measure) = measure {
                    self.repository.add(component, metric, measure)?;
                }
            }
        }
        Ok(())
    }

    fn aggregate(
        &self,
        component: &Component,
        parent: &mut Counters,
        current: &Counters,
    ) -> Result<(), FormulaError> {
        for (index, formula) in self.formulas.iter().enumerate() {
            let Some(child) = current.slots[index].as_deref() else {
                continue;
            };
            let target = parent.slots[index].get_or_insert_with(|| formula.new_counter());
            formula
                .aggregate_any(&mut **target, child)
                .map_err(|_| unknown_counter(formula.as_ref(), component.reference))?;
        }
        Ok(())
    }
}

fn unknown_counter(formula: &dyn AnyFormula, component: ComponentRef) -> FormulaError {
    FormulaError::UnknownCounter {
        formula: formula.output_keys().join(","),
        component,
    }
}

/// One counter slot per formula, filled on first use.
pub struct Counters {
    slots: Vec<Option<Box<dyn Any>>>,
}

impl Counters {
    fn empty(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
        }
    }
}

impl PathAwareVisitor for FormulaExecutor<'_> {
    type Element = Counters;
    type Error = FormulaError;

    fn order(&self) -> Order {
        Order::PostOrder
    }

    fn create_for_any(&mut self, _component: &Component) -> Counters {
        Counters::empty(self.formulas.len())
    }

    fn visit_any(&mut self, component: &Component, path: &mut Path<Counters>) -> Result<(), FormulaError> {
        let (current, parent) = path.current_and_parent_mut();
        let Some(current) = current else {
            return Ok(());
        };
        self.initialize_counters(component, current)?;
        self.create_measures(component, current)?;
        if let Some(parent) = parent {
            self.aggregate(component, parent, current)?;
        }
        Ok(())
    }
}
