//! # caliper-core
//!
//! **Tier 4 (Facade)**
//!
//! The entry point for embedders. An [`AnalysisContext`] gathers the tree,
//! the raw measures and the collaborators of one analysis; the computation
//! steps then fill its repository pass after pass.
//!
//! ## What belongs here
//! * `AnalysisContext` and its builder
//! * `ComputationStep` and the default step sequence
//! * `AnalysisError` and its reporting categories
//!
//! ## What does NOT belong here
//! * Formulas (see `caliper-formula`, `caliper-variation`)
//! * Reading reports or persisting measures
//!
//! ## Example
//! ```
//! use caliper_component::{Component, ComponentTree, ComponentType};
//! use caliper_core::{AnalysisContext, analyze};
//! use caliper_measure::Measure;
//! use caliper_metric::{MetricCatalog, core_metrics, keys};
//! use caliper_repository::MeasureRepository;
//!
//! let file = Component::builder(ComponentType::File, 2).uuid("F").build();
//! let root = Component::builder(ComponentType::Project, 1).uuid("P").child(file.clone()).build();
//! let mut measures = MeasureRepository::new();
//! measures.add(&file, core_metrics().get_by_key(keys::NCLOC)?, Measure::int(42))?;
//!
//! let mut context = AnalysisContext::builder(ComponentTree::new(root)?, 1_700_000_000_000)
//!     .measures(measures)
//!     .build()?;
//! analyze(&mut context)?;
//!
//! let project = context.root();
//! assert_eq!(context.repository().get_raw_measure(project, keys::NCLOC), Some(&Measure::int(42)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod context;
mod error;
pub mod steps;

use tracing::{debug, info};

pub use context::{AnalysisContext, AnalysisContextBuilder};
pub use error::{AnalysisError, ErrorCategory};
pub use steps::{ComputationStep, default_steps};

/// Run `steps` in order, stopping at the first failure.
pub fn run_steps(
    context: &mut AnalysisContext,
    steps: &[Box<dyn ComputationStep>],
) -> Result<(), AnalysisError> {
    for step in steps {
        debug!(step = step.description(), "executing step");
        step.execute(context)?;
    }
    Ok(())
}

/// Run every default step on `context`.
pub fn analyze(context: &mut AnalysisContext) -> Result<(), AnalysisError> {
    let root = context.root();
    info!(
        root = root.reference,
        components = context.tree().len(),
        "analysis started"
    );
    run_steps(context, &default_steps())?;
    info!(measures = context.repository().len(), "analysis finished");
    Ok(())
}
