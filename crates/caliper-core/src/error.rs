//! Errors aborting an analysis, and the categories they are reported under.

use std::fmt;

use caliper_component::TreeError;
use caliper_computer::ComputerError;
use caliper_formula::FormulaError;
use caliper_metric::MetricError;
use caliper_period::PeriodError;
use caliper_repository::RepositoryError;
use caliper_settings::SettingsError;
use caliper_variation::VariationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categories callers report errors under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Settings or period properties are invalid.
    ConfigurationError,
    /// A measure computer reads a metric nobody declares.
    MissingDependencyError,
    /// Measure computers depend on each other in a loop.
    CycleError,
    /// Two different measures for one component and metric.
    DuplicateMeasureError,
    /// A formula counter is missing or has the wrong type.
    UnknownCounterError,
    /// The component tree is malformed.
    InvalidTreeError,
    /// A measure or metric does not fit where it is used.
    InvalidMeasureError,
    /// A measure computer is badly declared or failed.
    ComputerError,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::ConfigurationError => "configuration_error",
            ErrorCategory::MissingDependencyError => "missing_dependency_error",
            ErrorCategory::CycleError => "cycle_error",
            ErrorCategory::DuplicateMeasureError => "duplicate_measure_error",
            ErrorCategory::UnknownCounterError => "unknown_counter_error",
            ErrorCategory::InvalidTreeError => "invalid_tree_error",
            ErrorCategory::InvalidMeasureError => "invalid_measure_error",
            ErrorCategory::ComputerError => "computer_error",
        };
        f.write_str(name)
    }
}

/// Any failure of an analysis. Every one is fatal.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Period(#[from] PeriodError),

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Variation(#[from] VariationError),

    #[error(transparent)]
    Computer(#[from] ComputerError),
}

impl AnalysisError {
    /// Category of the underlying failure, looking through wrapping errors.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::Tree(_) => ErrorCategory::InvalidTreeError,
            AnalysisError::Settings(_) | AnalysisError::Period(_) => {
                ErrorCategory::ConfigurationError
            }
            AnalysisError::Metric(_) => ErrorCategory::InvalidMeasureError,
            AnalysisError::Repository(err) => repository_category(err),
            AnalysisError::Formula(err) => formula_category(err),
            AnalysisError::Variation(err) => match err {
                VariationError::Metric(_) => ErrorCategory::InvalidMeasureError,
                VariationError::Repository(err) => repository_category(err),
                VariationError::Formula(err) => formula_category(err),
            },
            AnalysisError::Computer(err) => computer_category(err),
        }
    }
}

fn repository_category(err: &RepositoryError) -> ErrorCategory {
    match err {
        RepositoryError::DuplicateMeasure { .. } => ErrorCategory::DuplicateMeasureError,
        RepositoryError::MeasureNotFound { .. } | RepositoryError::ValueTypeMismatch { .. } => {
            ErrorCategory::InvalidMeasureError
        }
    }
}

fn formula_category(err: &FormulaError) -> ErrorCategory {
    match err {
        FormulaError::UnknownCounter { .. } => ErrorCategory::UnknownCounterError,
        FormulaError::InvalidData { .. } | FormulaError::Metric(_) => {
            ErrorCategory::InvalidMeasureError
        }
        FormulaError::Repository(err) => repository_category(err),
    }
}

fn computer_category(err: &ComputerError) -> ErrorCategory {
    match err {
        ComputerError::MissingDependency { .. } => ErrorCategory::MissingDependencyError,
        ComputerError::Cycle { .. } => ErrorCategory::CycleError,
        ComputerError::Repository(err) => repository_category(err),
        ComputerError::Metric(_) => ErrorCategory::InvalidMeasureError,
        ComputerError::InvalidOutput { .. }
        | ComputerError::DuplicateOutput { .. }
        | ComputerError::UndeclaredInput { .. }
        | ComputerError::UndeclaredOutput { .. }
        | ComputerError::InvalidDefinition(_)
        | ComputerError::Failed { .. } => ErrorCategory::ComputerError,
    }
}
