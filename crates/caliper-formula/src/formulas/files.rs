use caliper_component::ComponentType;
use caliper_measure::Measure;

use crate::{
    Counter, CounterInitializationContext, CreateMeasureContext, Formula, FormulaError,
};

/// Number of source files in the subtree. Unit test files are not counted.
///
/// Project views already carry the `files` measure of the project they
/// reference; it is read instead of counted, and left as is.
#[derive(Debug, Clone)]
pub struct FileCountFormula {
    metric_key: String,
}

impl FileCountFormula {
    pub fn new(metric_key: impl Into<String>) -> Self {
        Self {
            metric_key: metric_key.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileCounter {
    metric_key: String,
    files: i32,
}

impl Counter for FileCounter {
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        let leaf = context.leaf();
        self.files = match leaf.kind {
            ComponentType::File if !leaf.is_unit_test() => 1,
            ComponentType::ProjectView => context
                .measure(&self.metric_key)
                .and_then(Measure::int_value)
                .unwrap_or(0),
            _ => 0,
        };
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        self.files = self.files.saturating_add(other.files);
    }
}

impl Formula for FileCountFormula {
    type Counter = FileCounter;

    fn create_new_counter(&self) -> FileCounter {
        FileCounter {
            metric_key: self.metric_key.clone(),
            files: 0,
        }
    }

    fn create_measure(&self, counter: &FileCounter, context: &CreateMeasureContext<'_>) -> Option<Measure> {
        match context.component().kind {
            ComponentType::ProjectView => None,
            ComponentType::File if counter.files == 0 => None,
            _ => Some(Measure::int(counter.files)),
        }
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.metric_key.as_str()]
    }
}
