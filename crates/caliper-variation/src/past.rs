use std::collections::BTreeMap;

use caliper_component::Component;
use caliper_period::Period;
use serde::{Deserialize, Serialize};

/// Measures of past analyses, as persisted by earlier runs.
pub trait PastMeasures {
    /// Value of `metric_key` on `component` in the analysis of `period`.
    fn past_value(&self, period: &Period, component: &Component, metric_key: &str) -> Option<f64>;
}

/// Past values keyed by analysis uuid, component uuid and metric key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryPastMeasures {
    values: BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>,
}

impl InMemoryPastMeasures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        analysis_uuid: impl Into<String>,
        component_uuid: impl Into<String>,
        metric_key: impl Into<String>,
        value: f64,
    ) {
        self.values
            .entry(analysis_uuid.into())
            .or_default()
            .entry(component_uuid.into())
            .or_default()
            .insert(metric_key.into(), value);
    }

    #[must_use]
    pub fn with(
        mut self,
        analysis_uuid: impl Into<String>,
        component_uuid: impl Into<String>,
        metric_key: impl Into<String>,
        value: f64,
    ) -> Self {
        self.add(analysis_uuid, component_uuid, metric_key, value);
        self
    }
}

impl PastMeasures for InMemoryPastMeasures {
    fn past_value(&self, period: &Period, component: &Component, metric_key: &str) -> Option<f64> {
        self.values
            .get(&period.analysis_uuid)?
            .get(&component.uuid)?
            .get(metric_key)
            .copied()
    }
}
