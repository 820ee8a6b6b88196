use caliper_component::Component;
use caliper_crawler::{Order, TypeAwareVisitor, crawl};
use caliper_metric::MetricCatalog;
use caliper_repository::MeasureRepository;
use tracing::debug;

use crate::{ComputerError, MeasureComputerContext, SortedComputers};

/// Runs sorted measure computers on every component, leaves first.
pub struct MeasureComputersVisitor<'a> {
    catalog: &'a dyn MetricCatalog,
    repository: &'a mut MeasureRepository,
    computers: &'a SortedComputers,
}

impl<'a> MeasureComputersVisitor<'a> {
    pub fn new(
        catalog: &'a dyn MetricCatalog,
        repository: &'a mut MeasureRepository,
        computers: &'a SortedComputers,
    ) -> Self {
        Self {
            catalog,
            repository,
            computers,
        }
    }
}

impl TypeAwareVisitor for MeasureComputersVisitor<'_> {
    type Error = ComputerError;

    fn order(&self) -> Order {
        Order::PostOrder
    }

    fn visit_any(&mut self, component: &Component) -> Result<(), ComputerError> {
        for computer in self.computers.iter() {
            let mut context = MeasureComputerContext::new(
                computer.name(),
                computer.definition(),
                component,
                self.catalog,
                self.repository,
            );
            computer.compute(&mut context)?;
        }
        Ok(())
    }
}

/// Run every computer of `computers` over the tree rooted at `root`.
///
/// `catalog` must know the plugin metrics the computers write.
pub fn run_measure_computers(
    root: &Component,
    catalog: &dyn MetricCatalog,
    repository: &mut MeasureRepository,
    computers: &SortedComputers,
) -> Result<(), ComputerError> {
    if computers.is_empty() {
        return Ok(());
    }
    debug!(computers = computers.len(), "running measure computers");
    crawl(root, &mut MeasureComputersVisitor::new(catalog, repository, computers))
}
