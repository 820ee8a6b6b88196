use caliper_formula::{
    Counter, CounterInitializationContext, CreateMeasureContext, Formula, FormulaError,
    PeriodValues,
};
use caliper_measure::{Measure, MeasureVariations};
use caliper_metric::keys;

use crate::ScmInfoRepository;

/// Lines and conditions to cover, and left uncovered, among the lines
/// changed after each period's reference analysis.
///
/// Reads `coverage_line_hits_data`, `conditions_by_line` and
/// `covered_conditions_by_line`. Lines without a changeset are skipped; a
/// file without SCM data or without line hits gets no measure.
pub struct NewCoverageLinesFormula<'a> {
    scm: &'a dyn ScmInfoRepository,
}

impl<'a> NewCoverageLinesFormula<'a> {
    pub fn new(scm: &'a dyn ScmInfoRepository) -> Self {
        Self { scm }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCoverageCounter {
    new_lines: PeriodValues<i64>,
    new_covered_lines: PeriodValues<i64>,
    new_conditions: PeriodValues<i64>,
    new_covered_conditions: PeriodValues<i64>,
}

impl Counter for NewCoverageCounter {
    /// Seeded by [`NewCoverageLinesFormula`], which owns the SCM data.
    fn initialize(&mut self, _context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        self.new_lines.increment_all(&other.new_lines);
        self.new_covered_lines.increment_all(&other.new_covered_lines);
        self.new_conditions.increment_all(&other.new_conditions);
        self.new_covered_conditions
            .increment_all(&other.new_covered_conditions);
    }
}

impl Formula for NewCoverageLinesFormula<'_> {
    type Counter = NewCoverageCounter;

    fn create_new_counter(&self) -> NewCoverageCounter {
        NewCoverageCounter::default()
    }

    fn initialize_counter(
        &self,
        counter: &mut NewCoverageCounter,
        context: &CounterInitializationContext<'_>,
    ) -> Result<(), FormulaError> {
        let Some(scm) = self.scm.scm_info(context.leaf()) else {
            return Ok(());
        };
        let hits = context.line_data(keys::COVERAGE_LINE_HITS_DATA)?;
        if hits.is_empty() {
            return Ok(());
        }
        let conditions = context.line_data(keys::CONDITIONS_BY_LINE)?;
        let covered_conditions = context.line_data(keys::COVERED_CONDITIONS_BY_LINE)?;

        for (line, line_hits) in &hits {
            let Some(changeset) = scm.changeset_for_line(*line) else {
                continue;
            };
            let line_conditions = conditions.get(line).copied().unwrap_or(0);
            let line_covered_conditions = if line_conditions > 0 {
                covered_conditions.get(line).copied().unwrap_or(0)
            } else {
                0
            };
            for period in context.periods() {
                if changeset.date > period.snapshot_date {
                    counter.new_lines.increment(period, 1);
                    counter
                        .new_covered_lines
                        .increment(period, i64::from(*line_hits > 0));
                    counter.new_conditions.increment(period, line_conditions);
                    counter
                        .new_covered_conditions
                        .increment(period, line_covered_conditions);
                }
            }
        }
        Ok(())
    }

    fn create_measure(
        &self,
        counter: &NewCoverageCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Option<Measure> {
        let value_of = |index: usize| -> Option<i64> {
            let lines = counter.new_lines.get(index)?;
            let covered = counter.new_covered_lines.get(index).unwrap_or(0);
            let conditions = counter.new_conditions.get(index).unwrap_or(0);
            let covered_conditions = counter.new_covered_conditions.get(index).unwrap_or(0);
            match context.metric().key.as_str() {
                keys::NEW_LINES_TO_COVER => Some(lines),
                keys::NEW_UNCOVERED_LINES => Some(lines - covered),
                keys::NEW_CONDITIONS_TO_COVER => Some(conditions),
                keys::NEW_UNCOVERED_CONDITIONS => Some(conditions - covered_conditions),
                _ => None,
            }
        };
        let mut variations = MeasureVariations::new();
        for period in context.periods() {
            if let Some(value) = value_of(period.index) {
                variations.set(period.index, value as f64);
            }
        }
        (!variations.is_empty()).then(|| Measure::no_value().with_variations(variations))
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![
            keys::NEW_LINES_TO_COVER,
            keys::NEW_UNCOVERED_LINES,
            keys::NEW_CONDITIONS_TO_COVER,
            keys::NEW_UNCOVERED_CONDITIONS,
        ]
    }
}

/// Coverage ratios on new code, computed period by period from the
/// variations of the new-code coverage counts.
#[derive(Debug, Clone)]
pub struct NewCoverageRatioFormula {
    output: String,
    /// Total, uncovered, and for the combined ratio conditions and
    /// uncovered conditions.
    inputs: Vec<String>,
}

impl NewCoverageRatioFormula {
    /// `new_coverage`: lines and conditions together.
    pub fn lines_and_conditions(
        output: impl Into<String>,
        lines: impl Into<String>,
        uncovered_lines: impl Into<String>,
        conditions: impl Into<String>,
        uncovered_conditions: impl Into<String>,
    ) -> Self {
        Self {
            output: output.into(),
            inputs: vec![
                lines.into(),
                uncovered_lines.into(),
                conditions.into(),
                uncovered_conditions.into(),
            ],
        }
    }

    /// `new_line_coverage` or `new_branch_coverage`.
    pub fn single(
        output: impl Into<String>,
        total: impl Into<String>,
        uncovered: impl Into<String>,
    ) -> Self {
        Self {
            output: output.into(),
            inputs: vec![total.into(), uncovered.into()],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCoverageRatioCounter {
    inputs: Vec<String>,
    elements: PeriodValues<f64>,
    covered: PeriodValues<f64>,
}

impl Counter for NewCoverageRatioCounter {
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        let variation = |key: &str, index: usize| {
            context
                .measure(key)
                .and_then(Measure::variations)
                .and_then(|v| v.get(index))
        };
        for period in context.periods() {
            let index = period.index;
            let Some(total) = variation(&self.inputs[0], index) else {
                continue;
            };
            let uncovered = variation(&self.inputs[1], index).unwrap_or(0.0);
            let (elements, covered) = match self.inputs.get(2..4) {
                Some([conditions, uncovered_conditions]) => {
                    let conditions = variation(conditions, index).unwrap_or(0.0);
                    let uncovered_conditions = variation(uncovered_conditions, index).unwrap_or(0.0);
                    (
                        total + conditions,
                        total - uncovered + conditions - uncovered_conditions,
                    )
                }
                _ => (total, total - uncovered),
            };
            self.elements.increment(period, elements);
            self.covered.increment(period, covered);
        }
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        self.elements.increment_all(&other.elements);
        self.covered.increment_all(&other.covered);
    }
}

impl Formula for NewCoverageRatioFormula {
    type Counter = NewCoverageRatioCounter;

    fn create_new_counter(&self) -> NewCoverageRatioCounter {
        NewCoverageRatioCounter {
            inputs: self.inputs.clone(),
            ..NewCoverageRatioCounter::default()
        }
    }

    fn create_measure(
        &self,
        counter: &NewCoverageRatioCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Option<Measure> {
        let mut variations = MeasureVariations::new();
        for period in context.periods() {
            let (Some(elements), Some(covered)) = (
                counter.elements.get(period.index),
                counter.covered.get(period.index),
            ) else {
                continue;
            };
            if elements > 0.0 {
                variations.set(period.index, 100.0 * covered / elements);
            }
        }
        (!variations.is_empty()).then(|| Measure::no_value().with_variations(variations))
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.output.as_str()]
    }
}
