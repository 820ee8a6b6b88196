use caliper_variation::compute_variations;

use super::ComputationStep;
use crate::{AnalysisContext, AnalysisError};

/// Sets `current - past` on every numeric measure, per period.
pub struct VariationsStep;

impl ComputationStep for VariationsStep {
    fn description(&self) -> &'static str {
        "Compute measure variations"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let parts = context.parts();
        compute_variations(
            parts.root,
            parts.catalog,
            parts.repository,
            parts.periods.periods(),
            parts.past,
        )?;
        Ok(())
    }
}
