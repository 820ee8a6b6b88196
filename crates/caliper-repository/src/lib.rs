//! # caliper-repository
//!
//! **Tier 1 (Analysis State)**
//!
//! Holds every measure computed during one analysis, keyed by component
//! reference and metric key, next to the read-only "previous" (last persisted
//! analysis) and "current" (persisted so far) stores.
//!
//! ## What belongs here
//! * `MeasureRepository` and its add/update/get rules
//! * `RepositoryError`
//!
//! ## What does NOT belong here
//! * Persistence to a database
//! * Computing measures

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use caliper_component::{Component, ComponentRef};
use caliper_measure::Measure;
use caliper_metric::{Metric, ValueType};
use thiserror::Error;

/// Errors raised when storing measures.
#[derive(Debug, Error, PartialEq)]
pub enum RepositoryError {
    #[error("A different measure already exists for component {component} and metric '{metric}'")]
    DuplicateMeasure {
        component: ComponentRef,
        metric: String,
    },

    #[error("No measure exists for component {component} and metric '{metric}'")]
    MeasureNotFound {
        component: ComponentRef,
        metric: String,
    },

    #[error("Measure's ValueType ({measure}) is not consistent with the Metric's ValueType ({metric})")]
    ValueTypeMismatch { measure: ValueType, metric: ValueType },
}

type MeasuresByKey = BTreeMap<String, Measure>;

static NO_MEASURES: MeasuresByKey = BTreeMap::new();

/// Measures of one analysis.
#[derive(Debug, Clone, Default)]
pub struct MeasureRepository {
    raw: BTreeMap<ComponentRef, MeasuresByKey>,
    previous: BTreeMap<ComponentRef, MeasuresByKey>,
    current: BTreeMap<ComponentRef, MeasuresByKey>,
}

impl MeasureRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `measure` for the pair. Re-adding an identical measure is a
    /// no-op; a different one is a `DuplicateMeasure`.
    pub fn add(
        &mut self,
        component: &Component,
        metric: &Metric,
        measure: Measure,
    ) -> Result<(), RepositoryError> {
        check_value_type(metric, &measure)?;
        let by_key = self.raw.entry(component.reference).or_default();
        match by_key.get(&metric.key) {
            Some(existing) if *existing == measure => Ok(()),
            Some(_) => Err(RepositoryError::DuplicateMeasure {
                component: component.reference,
                metric: metric.key.clone(),
            }),
            None => {
                by_key.insert(metric.key.clone(), measure);
                Ok(())
            }
        }
    }

    /// Replace the measure of the pair, which must already exist.
    pub fn update(
        &mut self,
        component: &Component,
        metric: &Metric,
        measure: Measure,
    ) -> Result<(), RepositoryError> {
        check_value_type(metric, &measure)?;
        let slot = self
            .raw
            .get_mut(&component.reference)
            .and_then(|by_key| by_key.get_mut(&metric.key))
            .ok_or_else(|| RepositoryError::MeasureNotFound {
                component: component.reference,
                metric: metric.key.clone(),
            })?;
        *slot = measure;
        Ok(())
    }

    #[must_use]
    pub fn get_raw_measure(&self, component: &Component, metric_key: &str) -> Option<&Measure> {
        self.raw_by_ref(component.reference, metric_key)
    }

    /// Same as [`MeasureRepository::get_raw_measure`], by reference.
    #[must_use]
    pub fn raw_by_ref(&self, component: ComponentRef, metric_key: &str) -> Option<&Measure> {
        self.raw.get(&component).and_then(|m| m.get(metric_key))
    }

    /// Every raw measure of `component`, keyed by metric key.
    #[must_use]
    pub fn get_raw_measures(&self, component: &Component) -> &BTreeMap<String, Measure> {
        self.raw.get(&component.reference).unwrap_or(&NO_MEASURES)
    }

    /// Measure of the last persisted analysis.
    #[must_use]
    pub fn find_previous(&self, component: &Component, metric_key: &str) -> Option<&Measure> {
        self.previous
            .get(&component.reference)
            .and_then(|m| m.get(metric_key))
    }

    /// Measure persisted so far in this analysis.
    #[must_use]
    pub fn find_current(&self, component: &Component, metric_key: &str) -> Option<&Measure> {
        self.current
            .get(&component.reference)
            .and_then(|m| m.get(metric_key))
    }

    /// Seed the previous store. Used by the loader of the last analysis.
    pub fn load_previous(&mut self, component: ComponentRef, metric_key: &str, measure: Measure) {
        self.previous
            .entry(component)
            .or_default()
            .insert(metric_key.to_string(), measure);
    }

    /// Seed the current store. Used by the persistence layer.
    pub fn load_current(&mut self, component: ComponentRef, metric_key: &str, measure: Measure) {
        self.current
            .entry(component)
            .or_default()
            .insert(metric_key.to_string(), measure);
    }

    /// Every raw measure, ordered by component reference then metric key.
    pub fn iter_raw(&self) -> impl Iterator<Item = (ComponentRef, &str, &Measure)> {
        self.raw.iter().flat_map(|(component, by_key)| {
            by_key
                .iter()
                .map(move |(key, measure)| (*component, key.as_str(), measure))
        })
    }

    /// Number of raw measures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_value_type(metric: &Metric, measure: &Measure) -> Result<(), RepositoryError> {
    let measure_type = measure.value_type();
    if measure_type == ValueType::NoValue || measure_type == metric.value_type {
        return Ok(());
    }
    Err(RepositoryError::ValueTypeMismatch {
        measure: measure_type,
        metric: metric.value_type,
    })
}
