use caliper_formula::{
    Counter, CounterInitializationContext, CreateMeasureContext, Formula, FormulaError,
    PeriodValues,
};
use caliper_measure::Measure;
use caliper_metric::keys;

use crate::ScmInfoRepository;

/// Lines changed after each period's reference analysis.
///
/// When the file has `ncloc_data`, only lines of code count. Files without
/// SCM data get no measure.
pub struct NewLinesFormula<'a> {
    scm: &'a dyn ScmInfoRepository,
}

impl<'a> NewLinesFormula<'a> {
    pub fn new(scm: &'a dyn ScmInfoRepository) -> Self {
        Self { scm }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewLinesCounter {
    new_lines: PeriodValues<i32>,
}

impl Counter for NewLinesCounter {
    /// Seeded by [`NewLinesFormula`], which owns the SCM data.
    fn initialize(&mut self, _context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        self.new_lines.increment_all(&other.new_lines);
    }
}

impl Formula for NewLinesFormula<'_> {
    type Counter = NewLinesCounter;

    fn create_new_counter(&self) -> NewLinesCounter {
        NewLinesCounter::default()
    }

    fn initialize_counter(
        &self,
        counter: &mut NewLinesCounter,
        context: &CounterInitializationContext<'_>,
    ) -> Result<(), FormulaError> {
        let Some(scm) = self.scm.scm_info(context.leaf()) else {
            return Ok(());
        };
        let code_lines = context.line_data(keys::NCLOC_DATA)?;
        let is_counted = |line: u32| code_lines.is_empty() || code_lines.get(&line).is_some_and(|v| *v > 0);

        for period in context.periods() {
            let count = scm
                .iter()
                .filter(|(line, changeset)| changeset.date > period.snapshot_date && is_counted(*line))
                .count();
            counter
                .new_lines
                .increment(period, i32::try_from(count).unwrap_or(i32::MAX));
        }
        Ok(())
    }

    fn create_measure(&self, counter: &NewLinesCounter, context: &CreateMeasureContext<'_>) -> Option<Measure> {
        counter
            .new_lines
            .to_variations(context.periods(), f64::from)
            .map(|variations| Measure::no_value().with_variations(variations))
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![keys::NEW_LINES]
    }
}
