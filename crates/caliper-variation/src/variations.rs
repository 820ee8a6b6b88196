use caliper_component::Component;
use caliper_crawler::{Order, TypeAwareVisitor, crawl};
use caliper_measure::{Measure, MeasureVariations};
use caliper_metric::MetricCatalog;
use caliper_period::Period;
use caliper_repository::MeasureRepository;
use tracing::debug;

use crate::{PastMeasures, VariationError};

/// Sets `current - past` on every numeric raw measure, for every period
/// where a past value exists.
///
/// Slots already set on a measure are kept unless a past value overrides
/// them. Measures without any past value are left untouched.
pub struct VariationsVisitor<'a> {
    catalog: &'a dyn MetricCatalog,
    repository: &'a mut MeasureRepository,
    periods: &'a [Period],
    past: &'a dyn PastMeasures,
    updated: usize,
}

impl<'a> VariationsVisitor<'a> {
    pub fn new(
        catalog: &'a dyn MetricCatalog,
        repository: &'a mut MeasureRepository,
        periods: &'a [Period],
        past: &'a dyn PastMeasures,
    ) -> Self {
        Self {
            catalog,
            repository,
            periods,
            past,
            updated: 0,
        }
    }

    /// Measures that received at least one variation.
    #[must_use]
    pub fn updated(&self) -> usize {
        self.updated
    }

    fn variations_of(&self, component: &Component, key: &str, measure: &Measure) -> Option<MeasureVariations> {
        let current = measure.numeric_value()?;
        let mut variations = measure.variations().copied().unwrap_or_default();
        let mut changed = false;
        for period in self.periods {
            if let Some(past) = self.past.past_value(period, component, key) {
                variations.set(period.index, current - past);
                changed = true;
            }
        }
        changed.then_some(variations)
    }
}

impl TypeAwareVisitor for VariationsVisitor<'_> {
    type Error = VariationError;

    fn order(&self) -> Order {
        Order::PreOrder
    }

    fn visit_any(&mut self, component: &Component) -> Result<(), VariationError> {
        let catalog = self.catalog;
        let mut updates = Vec::new();
        for (key, measure) in self.repository.get_raw_measures(component) {
            let Some(metric) = catalog.find_by_key(key) else {
                continue;
            };
            if !metric.value_type.is_numeric() {
                continue;
            }
            if let Some(variations) = self.variations_of(component, key, measure) {
                updates.push((metric, measure.clone().with_variations(variations)));
            }
        }
        for (metric, measure) in updates {
            self.repository.update(component, metric, measure)?;
            self.updated += 1;
        }
        Ok(())
    }
}

/// Compute variations of every numeric raw measure of the tree.
pub fn compute_variations(
    root: &Component,
    catalog: &dyn MetricCatalog,
    repository: &mut MeasureRepository,
    periods: &[Period],
    past: &dyn PastMeasures,
) -> Result<usize, VariationError> {
    if periods.is_empty() {
        return Ok(0);
    }
    let mut visitor = VariationsVisitor::new(catalog, repository, periods, past);
    crawl(root, &mut visitor)?;
    debug!(updated = visitor.updated(), "variations computed");
    Ok(visitor.updated())
}
