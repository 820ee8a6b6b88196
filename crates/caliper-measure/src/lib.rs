//! # caliper-measure
//!
//! **Tier 0 (Core Types)**
//!
//! The value computed for one (component, metric) pair.
//!
//! ## What belongs here
//! * `Measure` and its typed `MeasureValue`
//! * `MeasureVariations`, the five period slots
//! * Quality gate status payloads
//! * The `k=v;k=v` data format used by line data and distributions
//!
//! ## What does NOT belong here
//! * Storage of measures (see `caliper-repository`)
//! * Computing measures (see `caliper-formula`)

#![forbid(unsafe_code)]

pub mod key_value;
mod variations;

use caliper_metric::ValueType;
use serde::{Deserialize, Serialize};

pub use variations::{MAX_PERIODS, MeasureVariations};

/// Quality gate level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Ok,
    Warn,
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Ok => write!(f, "OK"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

/// Quality gate outcome attached to a measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityGateStatus {
    pub level: Level,
    #[serde(default)]
    pub text: Option<String>,
}

impl QualityGateStatus {
    pub fn new(level: Level) -> Self {
        Self { level, text: None }
    }

    pub fn with_text(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: Some(text.into()),
        }
    }
}

/// Typed payload of a measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasureValue {
    NoValue,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    Data(String),
    Level(Level),
}

impl MeasureValue {
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            MeasureValue::NoValue => ValueType::NoValue,
            MeasureValue::Boolean(_) => ValueType::Boolean,
            MeasureValue::Int(_) => ValueType::Int,
            MeasureValue::Long(_) => ValueType::Long,
            MeasureValue::Double(_) => ValueType::Double,
            MeasureValue::String(_) => ValueType::String,
            MeasureValue::Data(_) => ValueType::Data,
            MeasureValue::Level(_) => ValueType::Level,
        }
    }
}

/// A measure for one component and one metric.
///
/// A measure without a scalar value (`NoValue`) may still carry variations;
/// new-code measures are built that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub value: MeasureValue,
    /// Free-form payload kept next to the value (line data, distributions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<MeasureVariations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_gate_status: Option<QualityGateStatus>,
}

impl Measure {
    fn of(value: MeasureValue) -> Self {
        Self {
            value,
            data: None,
            variations: None,
            quality_gate_status: None,
        }
    }

    #[must_use]
    pub fn no_value() -> Self {
        Self::of(MeasureValue::NoValue)
    }

    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::of(MeasureValue::Boolean(value))
    }

    #[must_use]
    pub fn int(value: i32) -> Self {
        Self::of(MeasureValue::Int(value))
    }

    #[must_use]
    pub fn long(value: i64) -> Self {
        Self::of(MeasureValue::Long(value))
    }

    #[must_use]
    pub fn double(value: f64) -> Self {
        Self::of(MeasureValue::Double(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::of(MeasureValue::String(value.into()))
    }

    pub fn data_value(value: impl Into<String>) -> Self {
        Self::of(MeasureValue::Data(value.into()))
    }

    #[must_use]
    pub fn level(level: Level) -> Self {
        Self::of(MeasureValue::Level(level))
    }

    /// Measure of a numeric `value_type` holding `value`, truncated for
    /// integral types. `None` for non-numeric types.
    #[must_use]
    pub fn from_number(value_type: ValueType, value: f64) -> Option<Self> {
        let value = match value_type {
            ValueType::Int => MeasureValue::Int(value as i32),
            ValueType::Long => MeasureValue::Long(value as i64),
            ValueType::Double => MeasureValue::Double(value),
            ValueType::Boolean => MeasureValue::Boolean(value != 0.0),
            _ => return None,
        };
        Some(Self::of(value))
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn with_variations(mut self, variations: MeasureVariations) -> Self {
        self.variations = Some(variations);
        self
    }

    #[must_use]
    pub fn with_quality_gate_status(mut self, status: QualityGateStatus) -> Self {
        self.quality_gate_status = Some(status);
        self
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    #[must_use]
    pub fn has_variations(&self) -> bool {
        self.variations.is_some()
    }

    #[must_use]
    pub fn variations(&self) -> Option<&MeasureVariations> {
        self.variations.as_ref()
    }

    #[must_use]
    pub fn int_value(&self) -> Option<i32> {
        match self.value {
            MeasureValue::Int(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn long_value(&self) -> Option<i64> {
        match self.value {
            MeasureValue::Long(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn double_value(&self) -> Option<f64> {
        match self.value {
            MeasureValue::Double(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn bool_value(&self) -> Option<bool> {
        match self.value {
            MeasureValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// String payload of `STRING` and `DATA` measures, else the free-form data.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        match &self.value {
            MeasureValue::String(v) | MeasureValue::Data(v) => Some(v),
            _ => self.data.as_deref(),
        }
    }

    /// Numeric value as `f64`, booleans counting as 0/1.
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        match self.value {
            MeasureValue::Boolean(v) => Some(if v { 1.0 } else { 0.0 }),
            MeasureValue::Int(v) => Some(f64::from(v)),
            MeasureValue::Long(v) => Some(v as f64),
            MeasureValue::Double(v) => Some(v),
            _ => None,
        }
    }
}
