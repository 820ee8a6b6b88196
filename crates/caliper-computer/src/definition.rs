use std::collections::BTreeSet;

use crate::ComputerError;

/// Metrics a measure computer reads and writes.
///
/// Built through [`MeasureComputerDefinition::builder`], which rejects a
/// definition without outputs, with a blank key, or with a metric that is
/// both read and written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureComputerDefinition {
    input_metrics: BTreeSet<String>,
    output_metrics: BTreeSet<String>,
}

impl MeasureComputerDefinition {
    pub fn builder() -> MeasureComputerDefinitionBuilder {
        MeasureComputerDefinitionBuilder::default()
    }

    pub fn input_metrics(&self) -> impl Iterator<Item = &str> {
        self.input_metrics.iter().map(String::as_str)
    }

    pub fn output_metrics(&self) -> impl Iterator<Item = &str> {
        self.output_metrics.iter().map(String::as_str)
    }

    #[must_use]
    pub fn reads(&self, metric_key: &str) -> bool {
        self.input_metrics.contains(metric_key)
    }

    #[must_use]
    pub fn writes(&self, metric_key: &str) -> bool {
        self.output_metrics.contains(metric_key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeasureComputerDefinitionBuilder {
    input_metrics: Vec<String>,
    output_metrics: Vec<String>,
}

impl MeasureComputerDefinitionBuilder {
    #[must_use]
    pub fn input_metrics<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_metrics = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn output_metrics<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_metrics = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<MeasureComputerDefinition, ComputerError> {
        if self.output_metrics.is_empty() {
            return Err(invalid("at least one output metric must be defined"));
        }
        if self
            .input_metrics
            .iter()
            .chain(&self.output_metrics)
            .any(|key| key.trim().is_empty())
        {
            return Err(invalid("metric keys cannot be blank"));
        }
        let input_metrics: BTreeSet<String> = self.input_metrics.into_iter().collect();
        let output_metrics: BTreeSet<String> = self.output_metrics.into_iter().collect();
        if let Some(key) = input_metrics.intersection(&output_metrics).next() {
            return Err(invalid(&format!(
                "metric '{key}' cannot be both an input and an output"
            )));
        }
        Ok(MeasureComputerDefinition {
            input_metrics,
            output_metrics,
        })
    }
}

fn invalid(reason: &str) -> ComputerError {
    ComputerError::InvalidDefinition(reason.to_string())
}
