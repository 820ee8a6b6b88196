use caliper_measure::{Measure, key_value};

use crate::{
    Counter, CounterInitializationContext, CreateMeasureContext, Formula, FormulaError,
};

/// Adds up a range distribution (`limit=count;...`) bucket by bucket.
///
/// Distributions with different bucket limits cannot be merged: once two
/// such inputs meet, the counter is poisoned and no measure is written.
#[derive(Debug, Clone)]
pub struct DistributionFormula {
    metric_key: String,
}

impl DistributionFormula {
    pub fn new(metric_key: impl Into<String>) -> Self {
        Self {
            metric_key: metric_key.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DistributionCounter {
    metric_key: String,
    buckets: Option<Vec<(String, f64)>>,
    incompatible: bool,
}

impl DistributionCounter {
    fn add(&mut self, buckets: &[(String, f64)]) {
        if self.incompatible {
            return;
        }
        let Some(current) = self.buckets.as_mut() else {
            self.buckets = Some(buckets.to_vec());
            return;
        };
        let same_limits = current.len() == buckets.len()
            && current.iter().zip(buckets).all(|(a, b)| a.0 == b.0);
        if same_limits {
            for (mine, theirs) in current.iter_mut().zip(buckets) {
                mine.1 += theirs.1;
            }
        } else {
            self.incompatible = true;
        }
    }

    fn format(&self) -> Option<String> {
        if self.incompatible {
            return None;
        }
        let buckets = self.buckets.as_ref()?;
        Some(key_value::format(buckets.iter().map(|(limit, count)| (limit, count))))
    }
}

impl Counter for DistributionCounter {
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        let Some(data) = context.measure(&self.metric_key).and_then(|m| m.string_value()) else {
            return Ok(());
        };
        let invalid = |source| FormulaError::InvalidData {
            component: context.leaf().reference,
            metric: self.metric_key.clone(),
            source,
        };
        let pairs = key_value::parse_pairs(data).map_err(invalid)?;
        let mut buckets = Vec::with_capacity(pairs.len());
        for (limit, count) in pairs {
            let count = count
                .parse::<f64>()
                .map_err(|_| invalid(key_value::KeyValueError::InvalidValue(count.to_string())))?;
            buckets.push((limit.to_string(), count));
        }
        self.add(&buckets);
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        if other.incompatible {
            self.incompatible = true;
        } else if let Some(buckets) = &other.buckets {
            self.add(buckets);
        }
    }
}

impl Formula for DistributionFormula {
    type Counter = DistributionCounter;

    fn create_new_counter(&self) -> DistributionCounter {
        DistributionCounter {
            metric_key: self.metric_key.clone(),
            ..DistributionCounter::default()
        }
    }

    fn create_measure(
        &self,
        counter: &DistributionCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Option<Measure> {
        if context.component().is_leaf() {
            return None;
        }
        counter.format().map(Measure::data_value)
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.metric_key.as_str()]
    }
}
