//! # caliper-computer
//!
//! **Tier 3 (Extensions)**
//!
//! Measure computers contributed by plugins. Each declares the metrics it
//! reads and writes; the sorter checks those declarations against the known
//! metrics and orders computers so that producers run before consumers.
//!
//! ## What belongs here
//! * `MeasureComputer` and `MeasureComputerDefinition`
//! * `sort_computers`, building the producer/consumer graph
//! * `MeasureComputersVisitor` and the restricted `MeasureComputerContext`
//!
//! ## What does NOT belong here
//! * Loading plugins
//! * Built-in aggregation (see `caliper-formula`)

#![forbid(unsafe_code)]

mod context;
mod definition;
mod sorter;
mod visitor;

use caliper_metric::MetricError;
use caliper_repository::RepositoryError;
use thiserror::Error;

pub use context::MeasureComputerContext;
pub use definition::{MeasureComputerDefinition, MeasureComputerDefinitionBuilder};
pub use sorter::{SortedComputers, sort_computers};
pub use visitor::{MeasureComputersVisitor, run_measure_computers};

/// Errors raised while validating, ordering or running measure computers.
#[derive(Debug, Error, PartialEq)]
pub enum ComputerError {
    #[error(
        "Metric '{metric}' cannot be used as an input metric as it's not a core metric and no plugin declares this metric (computer: {computer})"
    )]
    MissingDependency { computer: String, metric: String },

    #[error("Metric '{metric}' cannot be used as an output metric of {computer}: {reason}")]
    InvalidOutput {
        computer: String,
        metric: String,
        reason: String,
    },

    #[error("Output metric '{metric}' is already defined by {first}, cannot be redefined by {second}")]
    DuplicateOutput {
        metric: String,
        first: String,
        second: String,
    },

    #[error("A cycle has been detected between measure computers: {}", .computers.join(", "))]
    Cycle { computers: Vec<String> },

    #[error("Only metrics in {declared:?} can be read by {computer}, got '{metric}'")]
    UndeclaredInput {
        computer: String,
        metric: String,
        declared: Vec<String>,
    },

    #[error("Only metrics in {declared:?} can be written by {computer}, got '{metric}'")]
    UndeclaredOutput {
        computer: String,
        metric: String,
        declared: Vec<String>,
    },

    #[error("Invalid measure computer definition: {0}")]
    InvalidDefinition(String),

    #[error("Measure computer {computer} failed: {message}")]
    Failed { computer: String, message: String },

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A computation contributed by a plugin.
///
/// `compute` runs once per component, leaves first, and may only touch the
/// metrics named in its definition.
pub trait MeasureComputer {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    fn definition(&self) -> &MeasureComputerDefinition;

    fn compute(&self, context: &mut MeasureComputerContext<'_>) -> Result<(), ComputerError>;
}

impl std::fmt::Debug for dyn MeasureComputer + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasureComputer")
            .field("name", &self.name())
            .field("definition", self.definition())
            .finish()
    }
}
