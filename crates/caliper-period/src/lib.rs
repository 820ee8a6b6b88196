//! # caliper-period
//!
//! **Tier 2 (History)**
//!
//! Resolves, once per analysis, the up to five past analyses that variations
//! are computed against.
//!
//! ## What belongs here
//! * `Period`, `PeriodMode` and the immutable `PeriodsHolder`
//! * `Snapshot` history lookups (`SnapshotHistory`, `SnapshotQuery`)
//! * `PeriodResolver` and its precedence rules
//!
//! ## What does NOT belong here
//! * Reading settings files (see `caliper-settings`)
//! * Computing variations (see `caliper-variation`)

#![forbid(unsafe_code)]

pub mod dates;
mod holder;
mod resolver;
mod snapshot;

use caliper_settings::SettingsError;
use thiserror::Error;

pub use holder::{Period, PeriodMode, PeriodsHolder};
pub use resolver::{PREVIOUS_ANALYSIS, PREVIOUS_VERSION, PeriodResolver};
pub use snapshot::{
    InMemorySnapshotHistory, Snapshot, SnapshotHistory, SnapshotQuery, SnapshotStatus, SortOrder,
};

/// Errors from period resolution.
#[derive(Debug, Error)]
pub enum PeriodError {
    #[error("Invalid period configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Period index {0} is not in 1..=5")]
    InvalidIndex(usize),

    #[error("Period index {0} is defined more than once")]
    DuplicateIndex(usize),
}
