use caliper_period::PeriodResolver;
use tracing::debug;

use super::ComputationStep;
use crate::{AnalysisContext, AnalysisError};

/// Resolves the comparison periods from the settings and the snapshot
/// history of the root.
pub struct LoadPeriodsStep;

impl ComputationStep for LoadPeriodsStep {
    fn description(&self) -> &'static str {
        "Load differential periods"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let periods = PeriodResolver::new(
            context.history(),
            context.analysis_date(),
            context.root(),
            &context.settings().periods,
        )
        .resolve()?;
        debug!(periods = periods.periods().len(), "periods loaded");
        context.set_periods(periods);
        Ok(())
    }
}
