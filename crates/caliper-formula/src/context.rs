use std::collections::BTreeMap;

use caliper_component::Component;
use caliper_measure::{Measure, MeasureValue, key_value};
use caliper_metric::Metric;
use caliper_period::Period;
use caliper_repository::MeasureRepository;

use crate::FormulaError;

/// What a counter sees while being seeded, on a leaf or, for formulas that
/// seed every component, on any component.
#[derive(Debug, Clone, Copy)]
pub struct CounterInitializationContext<'a> {
    leaf: &'a Component,
    repository: &'a MeasureRepository,
    periods: &'a [Period],
}

impl<'a> CounterInitializationContext<'a> {
    #[must_use]
    pub fn new(leaf: &'a Component, repository: &'a MeasureRepository, periods: &'a [Period]) -> Self {
        Self {
            leaf,
            repository,
            periods,
        }
    }

    #[must_use]
    pub fn leaf(&self) -> &'a Component {
        self.leaf
    }

    /// The component being seeded. Same as [`Self::leaf`], named for
    /// formulas that also seed non-leaf components.
    #[must_use]
    pub fn component(&self) -> &'a Component {
        self.leaf
    }

    /// Raw measure of the leaf.
    #[must_use]
    pub fn measure(&self, metric_key: &str) -> Option<&'a Measure> {
        self.repository.get_raw_measure(self.leaf, metric_key)
    }

    /// Periods of the analysis; empty unless variation support is enabled.
    #[must_use]
    pub fn periods(&self) -> &'a [Period] {
        self.periods
    }

    /// Per-line data of the leaf (`line=value;...`). Absent and `NO_VALUE`
    /// measures read as an empty map.
    pub fn line_data(&self, metric_key: &str) -> Result<BTreeMap<u32, i64>, FormulaError> {
        let Some(measure) = self.measure(metric_key) else {
            return Ok(BTreeMap::new());
        };
        if measure.value == MeasureValue::NoValue && measure.data.is_none() {
            return Ok(BTreeMap::new());
        }
        let data = measure.string_value().unwrap_or_default();
        key_value::parse_line_data(data).map_err(|source| FormulaError::InvalidData {
            component: self.leaf.reference,
            metric: metric_key.to_string(),
            source,
        })
    }
}

/// What a formula sees while turning a counter into a measure.
#[derive(Debug, Clone, Copy)]
pub struct CreateMeasureContext<'a> {
    component: &'a Component,
    metric: &'a Metric,
    periods: &'a [Period],
}

impl<'a> CreateMeasureContext<'a> {
    #[must_use]
    pub fn new(component: &'a Component, metric: &'a Metric, periods: &'a [Period]) -> Self {
        Self {
            component,
            metric,
            periods,
        }
    }

    #[must_use]
    pub fn component(&self) -> &'a Component {
        self.component
    }

    /// The output metric being computed.
    #[must_use]
    pub fn metric(&self) -> &'a Metric {
        self.metric
    }

    #[must_use]
    pub fn periods(&self) -> &'a [Period] {
        self.periods
    }
}
