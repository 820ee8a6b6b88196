use caliper_measure::Measure;

use super::{add_opt, leaf_value};
use crate::{
    Counter, CounterInitializationContext, CreateMeasureContext, Formula, FormulaError,
};

/// `main / by`, summed over the subtree (e.g. complexity per function).
///
/// On a leaf where `by` is absent or zero, the optional fallback metric is
/// used as the divisor instead. A leaf only contributes when it has both a
/// main value and a divisor.
#[derive(Debug, Clone)]
pub struct AverageFormula {
    output: String,
    main: String,
    by: String,
    fallback: Option<String>,
}

impl AverageFormula {
    #[must_use]
    pub fn builder() -> AverageFormulaBuilder {
        AverageFormulaBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AverageFormulaBuilder {
    output: Option<String>,
    main: Option<String>,
    by: Option<String>,
    fallback: Option<String>,
}

impl AverageFormulaBuilder {
    #[must_use]
    pub fn output(mut self, key: impl Into<String>) -> Self {
        self.output = Some(key.into());
        self
    }

    #[must_use]
    pub fn main(mut self, key: impl Into<String>) -> Self {
        self.main = Some(key.into());
        self
    }

    #[must_use]
    pub fn by(mut self, key: impl Into<String>) -> Self {
        self.by = Some(key.into());
        self
    }

    #[must_use]
    pub fn fallback(mut self, key: impl Into<String>) -> Self {
        self.fallback = Some(key.into());
        self
    }

    /// `None` unless output, main and by are all set.
    #[must_use]
    pub fn build(self) -> Option<AverageFormula> {
        Some(AverageFormula {
            output: self.output?,
            main: self.main?,
            by: self.by?,
            fallback: self.fallback,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AverageCounter {
    main: String,
    by: String,
    fallback: Option<String>,
    main_sum: Option<f64>,
    by_sum: Option<f64>,
}

impl Counter for AverageCounter {
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        let main = leaf_value(context, &self.main);
        let by = leaf_value(context, &self.by)
            .filter(|v| *v != 0.0)
            .or_else(|| {
                self.fallback
                    .as_deref()
                    .and_then(|key| leaf_value(context, key))
            });
        if let (Some(main), Some(by)) = (main, by) {
            add_opt(&mut self.main_sum, Some(main));
            add_opt(&mut self.by_sum, Some(by));
        }
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        add_opt(&mut self.main_sum, other.main_sum);
        add_opt(&mut self.by_sum, other.by_sum);
    }
}

impl Formula for AverageFormula {
    type Counter = AverageCounter;

    fn create_new_counter(&self) -> AverageCounter {
        AverageCounter {
            main: self.main.clone(),
            by: self.by.clone(),
            fallback: self.fallback.clone(),
            ..AverageCounter::default()
        }
    }

    fn create_measure(&self, counter: &AverageCounter, _context: &CreateMeasureContext<'_>) -> Option<Measure> {
        let (main, by) = (counter.main_sum?, counter.by_sum?);
        (by > 0.0).then(|| Measure::double(main / by))
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.output.as_str()]
    }
}
