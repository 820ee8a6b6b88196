//! Per-period deltas of a measure.

use serde::{Deserialize, Serialize};

/// Number of comparison periods an analysis can have.
pub const MAX_PERIODS: usize = 5;

/// Five nullable deltas, one per period, indexed 1..=5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureVariations {
    slots: [Option<f64>; MAX_PERIODS],
}

impl MeasureVariations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw slots, slot 0 holding period 1.
    #[must_use]
    pub fn from_slots(slots: [Option<f64>; MAX_PERIODS]) -> Self {
        Self { slots }
    }

    /// Set the variation of period `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `1..=5`. Period indexes are validated when
    /// periods are resolved, so an invalid index is a programming error.
    pub fn set(&mut self, index: usize, value: f64) {
        assert!(
            (1..=MAX_PERIODS).contains(&index),
            "period index must be in 1..=5, got {index}"
        );
        self.slots[index - 1] = Some(value);
    }

    /// Builder form of [`MeasureVariations::set`].
    #[must_use]
    pub fn with(mut self, index: usize, value: f64) -> Self {
        self.set(index, value);
        self
    }

    /// Variation of period `index`, `None` when unset or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        index
            .checked_sub(1)
            .and_then(|i| self.slots.get(i))
            .copied()
            .flatten()
    }

    #[must_use]
    pub fn has(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<f64>; MAX_PERIODS] {
        &self.slots
    }

    /// Iterate over `(index, value)` for every set slot.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i + 1, v)))
    }
}
