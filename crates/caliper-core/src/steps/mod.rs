//! The computation steps of an analysis, in execution order.

mod computers;
mod measures;
mod new_code;
mod periods;
mod variations;

pub use computers::{ExecuteMeasureComputersStep, SortMeasureComputersStep};
pub use measures::{
    CommentMeasuresStep, ComplexityMeasuresStep, CoverageMeasuresStep, DuplicationMeasuresStep,
    SizeMeasuresStep, UnitTestMeasuresStep,
};
pub use new_code::{IssueMeasuresStep, NewCoverageMeasuresStep, NewLinesMeasuresStep};
pub use periods::LoadPeriodsStep;
pub use variations::VariationsStep;

use crate::{AnalysisContext, AnalysisError};

/// One stage of an analysis.
pub trait ComputationStep {
    /// Short label used in logs.
    fn description(&self) -> &'static str;

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError>;
}

/// Steps of a full analysis.
///
/// Periods are resolved first so that variation-aware formulas see them,
/// and measure computers are ordered before any measure is computed. Plain
/// variations come last, once every numeric measure exists.
pub fn default_steps() -> Vec<Box<dyn ComputationStep>> {
    vec![
        Box::new(LoadPeriodsStep),
        Box::new(SortMeasureComputersStep),
        Box::new(SizeMeasuresStep),
        Box::new(CommentMeasuresStep),
        Box::new(ComplexityMeasuresStep),
        Box::new(DuplicationMeasuresStep),
        Box::new(CoverageMeasuresStep),
        Box::new(UnitTestMeasuresStep),
        Box::new(IssueMeasuresStep),
        Box::new(NewLinesMeasuresStep),
        Box::new(NewCoverageMeasuresStep),
        Box::new(ExecuteMeasureComputersStep),
        Box::new(VariationsStep),
    ]
}
