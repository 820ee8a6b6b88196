use caliper_measure::Measure;

use crate::{
    Counter, CounterInitializationContext, CreateMeasureContext, Formula, FormulaError,
};

/// A number a [`SumFormula`] can add up.
pub trait Summable: Copy + std::fmt::Debug + 'static {
    fn from_measure(measure: &Measure) -> Option<Self>;
    fn into_measure(self) -> Measure;
    fn sum(self, other: Self) -> Self;
}

impl Summable for i32 {
    fn from_measure(measure: &Measure) -> Option<Self> {
        measure.int_value()
    }

    fn into_measure(self) -> Measure {
        Measure::int(self)
    }

    fn sum(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl Summable for i64 {
    fn from_measure(measure: &Measure) -> Option<Self> {
        measure.long_value()
    }

    fn into_measure(self) -> Measure {
        Measure::long(self)
    }

    fn sum(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl Summable for f64 {
    fn from_measure(measure: &Measure) -> Option<Self> {
        measure.double_value()
    }

    fn into_measure(self) -> Measure {
        Measure::double(self)
    }

    fn sum(self, other: Self) -> Self {
        self + other
    }
}

/// Adds up a metric over the subtree.
///
/// Leaves keep their raw value: the formula only writes on non-leaf
/// components. A component whose subtree holds no value gets no measure,
/// unless a default input is configured for leaves missing the metric.
#[derive(Debug, Clone)]
pub struct SumFormula<T> {
    metric_key: String,
    default_input: Option<T>,
}

impl SumFormula<i32> {
    pub fn int(metric_key: impl Into<String>) -> Self {
        Self::new(metric_key)
    }
}

impl SumFormula<i64> {
    pub fn long(metric_key: impl Into<String>) -> Self {
        Self::new(metric_key)
    }
}

impl SumFormula<f64> {
    pub fn double(metric_key: impl Into<String>) -> Self {
        Self::new(metric_key)
    }
}

impl<T: Summable> SumFormula<T> {
    fn new(metric_key: impl Into<String>) -> Self {
        Self {
            metric_key: metric_key.into(),
            default_input: None,
        }
    }

    /// Value used for leaves without the metric.
    #[must_use]
    pub fn with_default_input(mut self, value: T) -> Self {
        self.default_input = Some(value);
        self
    }
}

#[derive(Debug, Clone)]
pub struct SumCounter<T> {
    metric_key: String,
    default_input: Option<T>,
    value: Option<T>,
}

impl<T: Summable> SumCounter<T> {
    fn add(&mut self, value: T) {
        self.value = Some(match self.value {
            Some(current) => current.sum(value),
            None => value,
        });
    }

    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.value
    }
}

impl<T: Summable> Counter for SumCounter<T> {
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        let value = context
            .measure(&self.metric_key)
            .and_then(T::from_measure)
            .or(self.default_input);
        if let Some(value) = value {
            self.add(value);
        }
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        if let Some(value) = other.value {
            self.add(value);
        }
    }
}

impl<T: Summable> Formula for SumFormula<T> {
    type Counter = SumCounter<T>;

    fn create_new_counter(&self) -> SumCounter<T> {
        SumCounter {
            metric_key: self.metric_key.clone(),
            default_input: self.default_input,
            value: None,
        }
    }

    fn create_measure(&self, counter: &SumCounter<T>, context: &CreateMeasureContext<'_>) -> Option<Measure> {
        if context.component().is_leaf() {
            return None;
        }
        counter.value.map(Summable::into_measure)
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.metric_key.as_str()]
    }
}
