use std::ops::AddAssign;

use caliper_measure::{MAX_PERIODS, MeasureVariations};
use caliper_period::Period;

/// One optional accumulator per period index (1..=5).
///
/// A slot stays unset until something is added to it, so "no new code in
/// this period" and "zero" stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodValues<T = f64> {
    slots: [Option<T>; MAX_PERIODS],
}

impl<T: Copy> Default for PeriodValues<T> {
    fn default() -> Self {
        Self {
            slots: [None; MAX_PERIODS],
        }
    }
}

impl<T> PeriodValues<T>
where
    T: Copy + AddAssign,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the slot of `period`, setting it if needed.
    pub fn increment(&mut self, period: &Period, value: T) {
        if let Some(slot) = Self::slot_index(period.index) {
            match &mut self.slots[slot] {
                Some(current) => *current += value,
                empty => *empty = Some(value),
            }
        }
    }

    /// Add every set slot of `other`.
    pub fn increment_all(&mut self, other: &Self) {
        for (mine, theirs) in self.slots.iter_mut().zip(other.slots.iter()) {
            if let Some(value) = theirs {
                match mine {
                    Some(current) => *current += *value,
                    empty => *empty = Some(*value),
                }
            }
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        Self::slot_index(index).and_then(|slot| self.slots[slot])
    }

    #[must_use]
    pub fn is_set(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Variations for the slots of `periods` that are set, mapped through `f`.
    /// `None` when no slot is set.
    pub fn to_variations<F>(&self, periods: &[Period], f: F) -> Option<MeasureVariations>
    where
        F: Fn(T) -> f64,
    {
        let mut variations = MeasureVariations::new();
        for period in periods {
            if let Some(value) = self.get(period.index) {
                variations.set(period.index, f(value));
            }
        }
        (!variations.is_empty()).then_some(variations)
    }

    fn slot_index(index: usize) -> Option<usize> {
        (1..=MAX_PERIODS).contains(&index).then(|| index - 1)
    }
}
