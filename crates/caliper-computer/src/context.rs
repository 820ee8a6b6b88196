use caliper_component::Component;
use caliper_measure::Measure;
use caliper_metric::MetricCatalog;
use caliper_repository::MeasureRepository;

use crate::{ComputerError, MeasureComputerDefinition};

/// What a measure computer sees of the current component: reads limited to
/// its input metrics, writes limited to its output metrics.
pub struct MeasureComputerContext<'a> {
    computer: &'a str,
    definition: &'a MeasureComputerDefinition,
    component: &'a Component,
    catalog: &'a dyn MetricCatalog,
    repository: &'a mut MeasureRepository,
}

impl<'a> MeasureComputerContext<'a> {
    pub fn new(
        computer: &'a str,
        definition: &'a MeasureComputerDefinition,
        component: &'a Component,
        catalog: &'a dyn MetricCatalog,
        repository: &'a mut MeasureRepository,
    ) -> Self {
        Self {
            computer,
            definition,
            component,
            catalog,
            repository,
        }
    }

    pub fn component(&self) -> &Component {
        self.component
    }

    /// Raw measure of the current component.
    pub fn measure(&self, metric_key: &str) -> Result<Option<&Measure>, ComputerError> {
        self.check_input(metric_key)?;
        Ok(self.repository.get_raw_measure(self.component, metric_key))
    }

    /// Raw measures of the direct children that have one.
    pub fn children_measures(&self, metric_key: &str) -> Result<Vec<&Measure>, ComputerError> {
        self.check_input(metric_key)?;
        Ok(self
            .component
            .children
            .iter()
            .filter_map(|child| self.repository.get_raw_measure(child, metric_key))
            .collect())
    }

    pub fn add_int(&mut self, metric_key: &str, value: i32) -> Result<(), ComputerError> {
        self.add(metric_key, Measure::int(value))
    }

    pub fn add_long(&mut self, metric_key: &str, value: i64) -> Result<(), ComputerError> {
        self.add(metric_key, Measure::long(value))
    }

    pub fn add_double(&mut self, metric_key: &str, value: f64) -> Result<(), ComputerError> {
        self.add(metric_key, Measure::double(value))
    }

    pub fn add_bool(&mut self, metric_key: &str, value: bool) -> Result<(), ComputerError> {
        self.add(metric_key, Measure::boolean(value))
    }

    pub fn add_string(&mut self, metric_key: &str, value: impl Into<String>) -> Result<(), ComputerError> {
        self.add(metric_key, Measure::string(value))
    }

    fn add(&mut self, metric_key: &str, measure: Measure) -> Result<(), ComputerError> {
        if !self.definition.writes(metric_key) {
            return Err(ComputerError::UndeclaredOutput {
                computer: self.computer.to_string(),
                metric: metric_key.to_string(),
                declared: self.definition.output_metrics().map(str::to_string).collect(),
            });
        }
        let metric = self.catalog.get_by_key(metric_key)?;
        self.repository.add(self.component, metric, measure)?;
        Ok(())
    }

    fn check_input(&self, metric_key: &str) -> Result<(), ComputerError> {
        if self.definition.reads(metric_key) {
            return Ok(());
        }
        Err(ComputerError::UndeclaredInput {
            computer: self.computer.to_string(),
            metric: metric_key.to_string(),
            declared: self.definition.input_metrics().map(str::to_string).collect(),
        })
    }
}
