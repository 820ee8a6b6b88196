use caliper_measure::Measure;

use super::{leaf_value, percent};
use crate::{
    Counter, CounterInitializationContext, CreateMeasureContext, Formula, FormulaError,
};

/// Overall coverage from lines and conditions:
/// `100 * (lines + conditions - uncovered_lines - uncovered_conditions) / (lines + conditions)`.
///
/// A leaf without `lines_to_cover` does not take part; its other inputs
/// default to 0.
#[derive(Debug, Clone)]
pub struct LinesAndConditionsCoverageFormula {
    output: String,
    lines: String,
    uncovered_lines: String,
    conditions: String,
    uncovered_conditions: String,
}

impl LinesAndConditionsCoverageFormula {
    pub fn new(
        output: impl Into<String>,
        lines: impl Into<String>,
        uncovered_lines: impl Into<String>,
        conditions: impl Into<String>,
        uncovered_conditions: impl Into<String>,
    ) -> Self {
        Self {
            output: output.into(),
            lines: lines.into(),
            uncovered_lines: uncovered_lines.into(),
            conditions: conditions.into(),
            uncovered_conditions: uncovered_conditions.into(),
        }
    }
}

/// Covered and coverable element counts.
#[derive(Debug, Clone, Default)]
pub struct CoverageCounter {
    keys: Vec<String>,
    elements: f64,
    covered: f64,
    initialized: bool,
}

impl CoverageCounter {
    fn add(&mut self, elements: f64, covered: f64) {
        self.elements += elements;
        self.covered += covered;
        self.initialized = true;
    }

    fn measure(&self) -> Option<Measure> {
        if !self.initialized {
            return None;
        }
        percent(self.covered, self.elements).map(Measure::double)
    }
}

impl Counter for CoverageCounter {
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        let Some((total_key, rest)) = self.keys.split_first() else {
            return Ok(());
        };
        let Some(total) = leaf_value(context, total_key) else {
            return Ok(());
        };
        let value = |key: &str| leaf_value(context, key).unwrap_or(0.0);
        let (elements, covered) = match rest {
            [uncovered] => (total, total - value(uncovered)),
            [uncovered_lines, conditions, uncovered_conditions] => {
                let conditions = value(conditions);
                (
                    total + conditions,
                    total - value(uncovered_lines) + conditions - value(uncovered_conditions),
                )
            }
            _ => return Ok(()),
        };
        self.add(elements, covered);
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        if other.initialized {
            self.add(other.elements, other.covered);
        }
    }
}

impl Formula for LinesAndConditionsCoverageFormula {
    type Counter = CoverageCounter;

    fn create_new_counter(&self) -> CoverageCounter {
        CoverageCounter {
            keys: vec![
                self.lines.clone(),
                self.uncovered_lines.clone(),
                self.conditions.clone(),
                self.uncovered_conditions.clone(),
            ],
            ..CoverageCounter::default()
        }
    }

    fn create_measure(&self, counter: &CoverageCounter, _context: &CreateMeasureContext<'_>) -> Option<Measure> {
        counter.measure()
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.output.as_str()]
    }
}

/// Line or branch coverage: `100 * (total - uncovered) / total`.
#[derive(Debug, Clone)]
pub struct SingleWithUncoveredFormula {
    output: String,
    total: String,
    uncovered: String,
}

impl SingleWithUncoveredFormula {
    pub fn new(
        output: impl Into<String>,
        total: impl Into<String>,
        uncovered: impl Into<String>,
    ) -> Self {
        Self {
            output: output.into(),
            total: total.into(),
            uncovered: uncovered.into(),
        }
    }
}

impl Formula for SingleWithUncoveredFormula {
    type Counter = CoverageCounter;

    fn create_new_counter(&self) -> CoverageCounter {
        CoverageCounter {
            keys: vec![self.total.clone(), self.uncovered.clone()],
            ..CoverageCounter::default()
        }
    }

    fn create_measure(&self, counter: &CoverageCounter, _context: &CreateMeasureContext<'_>) -> Option<Measure> {
        counter.measure()
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.output.as_str()]
    }
}
