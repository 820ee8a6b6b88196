//! # caliper-metric
//!
//! **Tier 0 (Core Types)**
//!
//! Metric definitions and the catalog analyses look them up in.
//!
//! ## What belongs here
//! * `Metric` and `ValueType`
//! * The `MetricCatalog` lookup contract and its in-memory implementation
//! * Keys of the core metrics every analysis knows about
//!
//! ## What does NOT belong here
//! * Measure values (see `caliper-measure`)
//! * Loading metrics from a database

#![forbid(unsafe_code)]

mod catalog;
pub mod keys;

use serde::{Deserialize, Serialize};

pub use catalog::{
    MetricCatalog, MetricError, MetricRepository, core_metric_keys, core_metrics,
};

/// The type of value a metric holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    NoValue,
    Boolean,
    Int,
    Long,
    Double,
    String,
    Data,
    Level,
}

impl ValueType {
    /// Types whose values take part in arithmetic (sums, variations).
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ValueType::Boolean | ValueType::Int | ValueType::Long | ValueType::Double
        )
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueType::NoValue => "NO_VALUE",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Int => "INT",
            ValueType::Long => "LONG",
            ValueType::Double => "DOUBLE",
            ValueType::String => "STRING",
            ValueType::Data => "DATA",
            ValueType::Level => "LEVEL",
        };
        f.write_str(name)
    }
}

/// A metric definition. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metric {
    pub id: u32,
    pub key: String,
    pub name: String,
    pub value_type: ValueType,
    /// Number of decimals kept for `DOUBLE` values.
    #[serde(default)]
    pub decimal_scale: Option<u8>,
}

impl Metric {
    pub fn new(
        id: u32,
        key: impl Into<String>,
        name: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            id,
            key: key.into(),
            name: name.into(),
            value_type,
            decimal_scale: None,
        }
    }

    #[must_use]
    pub fn with_decimal_scale(mut self, scale: u8) -> Self {
        self.decimal_scale = Some(scale);
        self
    }

    /// Round `value` to the metric's decimal scale, if any.
    #[must_use]
    pub fn scale(&self, value: f64) -> f64 {
        match self.decimal_scale {
            Some(scale) => {
                let factor = 10f64.powi(i32::from(scale));
                (value * factor).round() / factor
            }
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_types() {
        assert!(ValueType::Int.is_numeric());
        assert!(ValueType::Boolean.is_numeric());
        assert!(!ValueType::Data.is_numeric());
        assert!(!ValueType::NoValue.is_numeric());
        assert!(!ValueType::Level.is_numeric());
    }

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(ValueType::NoValue.to_string(), "NO_VALUE");
        assert_eq!(
            serde_json::to_string(&ValueType::NoValue).unwrap(),
            "\"NO_VALUE\""
        );
    }

    #[test]
    fn scale_rounds_half_away_from_zero() {
        let m = Metric::new(1, "coverage", "Coverage", ValueType::Double).with_decimal_scale(1);
        assert_eq!(m.scale(66.66), 66.7);
        assert_eq!(m.scale(12.25), 12.3);
    }

    #[test]
    fn scale_without_decimal_scale_is_identity() {
        let m = Metric::new(1, "x", "X", ValueType::Double);
        assert_eq!(m.scale(1.23456), 1.23456);
    }
}
