use caliper_computer::run_measure_computers;

use super::ComputationStep;
use crate::{AnalysisContext, AnalysisError};

/// Checks the metrics declared by measure computers and orders them.
pub struct SortMeasureComputersStep;

impl ComputationStep for SortMeasureComputersStep {
    fn description(&self) -> &'static str {
        "Sort measure computers"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        context.sort_computers()
    }
}

/// Runs the sorted measure computers over the tree.
pub struct ExecuteMeasureComputersStep;

impl ComputationStep for ExecuteMeasureComputersStep {
    fn description(&self) -> &'static str {
        "Execute measure computers"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let parts = context.parts();
        run_measure_computers(parts.root, parts.catalog, parts.repository, parts.computers)?;
        Ok(())
    }
}
