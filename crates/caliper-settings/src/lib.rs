//! # caliper-settings
//!
//! **Tier 0 (Pure Settings)**
//!
//! Settings an analysis reads, with TOML loading.
//!
//! ## What belongs here
//! * Pure data types with Serde derive
//! * Comparison period properties (`period1` .. `period5`, optionally
//!   qualified as `period1.TRK`)
//! * Default values
//!
//! ## What does NOT belong here
//! * Interpreting period values (see `caliper-period`)
//!
//! ## Example
//! ```
//! use caliper_settings::AnalysisSettings;
//!
//! let settings = AnalysisSettings::from_toml(r#"
//! [periods]
//! period1 = "previous_version"
//! "period2.TRK" = "7"
//! "#).unwrap();
//! assert_eq!(settings.periods.get(1, "TRK"), Some("previous_version"));
//! assert_eq!(settings.periods.get(2, "TRK"), Some("7"));
//! assert_eq!(settings.periods.get(2, "VW"), None);
//! ```

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest period index.
pub const MAX_PERIOD_INDEX: usize = 5;

const PERIOD_PREFIX: &str = "period";

/// Errors from loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse settings TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unknown period property '{0}', expected period1..period5 with an optional .QUALIFIER")]
    UnknownPeriodKey(String),
}

/// Root analysis settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Comparison period properties. A `[periods]` table replaces the
    /// defaults as a whole.
    pub periods: PeriodSettings,
}

impl AnalysisSettings {
    /// Parse settings from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(s)?)
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// Raw period properties, keyed `period{i}` or `period{i}.{QUALIFIER}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodSettings {
    properties: BTreeMap<String, String>,
}

impl Default for PeriodSettings {
    /// `period1 = previous_analysis`, `period2 = 30`, `period3 = previous_version`.
    fn default() -> Self {
        Self::empty()
            .with("period1", "previous_analysis")
            .with("period2", "30")
            .with("period3", "previous_version")
    }
}

impl PeriodSettings {
    /// No period configured at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.properties.remove(key)
    }

    /// Value for period `index` under `qualifier`: `period{index}.{qualifier}`
    /// wins over `period{index}`. Blank values count as absent.
    #[must_use]
    pub fn get(&self, index: usize, qualifier: &str) -> Option<&str> {
        let qualified = format!("{PERIOD_PREFIX}{index}.{qualifier}");
        let plain = format!("{PERIOD_PREFIX}{index}");
        [qualified, plain]
            .iter()
            .filter_map(|key| self.properties.get(key))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }

    /// Every raw property, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check every key is `period1`..`period5`, optionally followed by
    /// `.QUALIFIER`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        match self.properties.keys().find(|key| !is_period_key(key)) {
            Some(key) => Err(SettingsError::UnknownPeriodKey(key.clone())),
            None => Ok(()),
        }
    }
}

fn is_period_key(key: &str) -> bool {
    let Some(rest) = key.strip_prefix(PERIOD_PREFIX) else {
        return false;
    };
    let (index, qualifier) = match rest.split_once('.') {
        Some((index, qualifier)) => (index, Some(qualifier)),
        None => (rest, None),
    };
    let valid_index = index
        .parse::<usize>()
        .is_ok_and(|i| (1..=MAX_PERIOD_INDEX).contains(&i))
        && index.len() == 1;
    let valid_qualifier = qualifier.is_none_or(|q| {
        !q.is_empty() && q.chars().all(|c| c.is_ascii_uppercase() || c == '_')
    });
    valid_index && valid_qualifier
}
