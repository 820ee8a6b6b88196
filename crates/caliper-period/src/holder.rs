use serde::{Deserialize, Serialize};

use crate::PeriodError;
use caliper_settings::MAX_PERIOD_INDEX;

/// How a period's reference analysis was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodMode {
    Days,
    Date,
    PreviousAnalysis,
    PreviousVersion,
    Version,
}

impl std::fmt::Display for PeriodMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PeriodMode::Days => "days",
            PeriodMode::Date => "date",
            PeriodMode::PreviousAnalysis => "previous_analysis",
            PeriodMode::PreviousVersion => "previous_version",
            PeriodMode::Version => "version",
        };
        f.write_str(name)
    }
}

/// A resolved comparison point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// 1..=5
    pub index: usize,
    pub mode: PeriodMode,
    #[serde(default)]
    pub mode_parameter: Option<String>,
    /// `created_at` of the reference snapshot, epoch milliseconds.
    pub snapshot_date: i64,
    pub snapshot_id: i64,
    pub analysis_uuid: String,
}

/// The periods of one analysis. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodsHolder {
    periods: Vec<Period>,
}

impl PeriodsHolder {
    /// Holder with no period, as on a first analysis.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check indexes are in 1..=5 and unique, then sort by index.
    pub fn new(mut periods: Vec<Period>) -> Result<Self, PeriodError> {
        periods.sort_by_key(|p| p.index);
        for (i, period) in periods.iter().enumerate() {
            if !(1..=MAX_PERIOD_INDEX).contains(&period.index) {
                return Err(PeriodError::InvalidIndex(period.index));
            }
            if i > 0 && periods[i - 1].index == period.index {
                return Err(PeriodError::DuplicateIndex(period.index));
            }
        }
        Ok(Self { periods })
    }

    /// Periods ordered by index.
    #[must_use]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    #[must_use]
    pub fn period(&self, index: usize) -> Option<&Period> {
        self.periods.iter().find(|p| p.index == index)
    }

    #[must_use]
    pub fn has_period(&self, index: usize) -> bool {
        self.period(index).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
