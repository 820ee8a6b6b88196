use caliper_measure::Measure;

use crate::{
    Counter, CounterInitializationContext, CreateMeasureContext, Formula, FormulaError,
    PeriodValues,
};

/// Sums the variations of a metric, each period slot on its own.
///
/// Used where the per-line inputs of new-code metrics are not available,
/// e.g. on views, whose leaves already carry the variations of the
/// referenced projects. Writes `NO_VALUE` measures with variations on
/// non-leaf components only.
#[derive(Debug, Clone)]
pub struct VariationSumFormula {
    metric_key: String,
}

impl VariationSumFormula {
    pub fn new(metric_key: impl Into<String>) -> Self {
        Self {
            metric_key: metric_key.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VariationSumCounter {
    metric_key: String,
    values: PeriodValues<f64>,
}

impl Counter for VariationSumCounter {
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        let Some(variations) = context
            .measure(&self.metric_key)
            .and_then(Measure::variations)
        else {
            return Ok(());
        };
        for period in context.periods() {
            if let Some(value) = variations.get(period.index) {
                self.values.increment(period, value);
            }
        }
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        self.values.increment_all(&other.values);
    }
}

impl Formula for VariationSumFormula {
    type Counter = VariationSumCounter;

    fn create_new_counter(&self) -> VariationSumCounter {
        VariationSumCounter {
            metric_key: self.metric_key.clone(),
            ..VariationSumCounter::default()
        }
    }

    fn create_measure(
        &self,
        counter: &VariationSumCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Option<Measure> {
        if context.component().is_leaf() {
            return None;
        }
        counter
            .values
            .to_variations(context.periods(), |v| v)
            .map(|variations| Measure::no_value().with_variations(variations))
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.metric_key.as_str()]
    }
}
