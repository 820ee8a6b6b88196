use std::collections::BTreeMap;

use caliper_metric::MetricCatalog;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::{ComputerError, MeasureComputer};

/// Measure computers in execution order: every producer of a metric comes
/// before its consumers.
#[derive(Debug, Default)]
pub struct SortedComputers {
    computers: Vec<Box<dyn MeasureComputer>>,
}

impl SortedComputers {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.computers.iter().map(|c| c.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn MeasureComputer> {
        self.computers.iter().map(|c| &**c)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.computers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.computers.is_empty()
    }
}

/// Check the declared metrics of `computers` and order them.
///
/// Inputs must be core metrics or metrics declared by a plugin. Outputs must
/// be declared by a plugin and must not be core metrics. A computer reading a
/// metric another one writes runs after it. Cycles are reported before
/// metrics with several producers.
pub fn sort_computers(
    computers: Vec<Box<dyn MeasureComputer>>,
    core_metrics: &dyn MetricCatalog,
    plugin_metrics: &dyn MetricCatalog,
) -> Result<SortedComputers, ComputerError> {
    let mut producers: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, computer) in computers.iter().enumerate() {
        for metric in computer.definition().output_metrics() {
            validate_output(computer.name(), metric, core_metrics, plugin_metrics)?;
            producers.entry(metric).or_default().push(index);
        }
    }

    let mut graph = DiGraph::<usize, ()>::new();
    let nodes: Vec<NodeIndex> = (0..computers.len()).map(|i| graph.add_node(i)).collect();
    for (index, computer) in computers.iter().enumerate() {
        for metric in computer.definition().input_metrics() {
            if let Some(indexes) = producers.get(metric) {
                for &producer in indexes {
                    graph.add_edge(nodes[producer], nodes[index], ());
                }
                continue;
            }
            let declared = core_metrics.find_by_key(metric).is_some()
                || plugin_metrics.find_by_key(metric).is_some();
            if !declared {
                return Err(ComputerError::MissingDependency {
                    computer: computer.name().to_string(),
                    metric: metric.to_string(),
                });
            }
        }
    }

    let order = toposort(&graph, None).map_err(|cycle| {
        let mut members: Vec<usize> = tarjan_scc(&graph)
            .into_iter()
            .find(|component| component.contains(&cycle.node_id()))
            .unwrap_or_else(|| vec![cycle.node_id()])
            .into_iter()
            .map(|node| graph[node])
            .collect();
        members.sort_unstable();
        ComputerError::Cycle {
            computers: members
                .into_iter()
                .map(|i| computers[i].name().to_string())
                .collect(),
        }
    })?;

    // Only reported once the graph is known to be acyclic.
    if let Some((metric, indexes)) = producers.iter().find(|(_, indexes)| indexes.len() > 1) {
        return Err(ComputerError::DuplicateOutput {
            metric: (*metric).to_string(),
            first: computers[indexes[0]].name().to_string(),
            second: computers[indexes[1]].name().to_string(),
        });
    }

    let mut slots: Vec<Option<Box<dyn MeasureComputer>>> = computers.into_iter().map(Some).collect();
    let sorted = SortedComputers {
        computers: order
            .into_iter()
            .filter_map(|node| slots[graph[node]].take())
            .collect(),
    };
    debug!(order = ?sorted.names(), "measure computers sorted");
    Ok(sorted)
}

fn validate_output(
    computer: &str,
    metric: &str,
    core_metrics: &dyn MetricCatalog,
    plugin_metrics: &dyn MetricCatalog,
) -> Result<(), ComputerError> {
    let reason = if core_metrics.find_by_key(metric).is_some() {
        "core metrics cannot be computed by plugins"
    } else if plugin_metrics.find_by_key(metric).is_none() {
        "no plugin declares this metric"
    } else {
        return Ok(());
    };
    Err(ComputerError::InvalidOutput {
        computer: computer.to_string(),
        metric: metric.to_string(),
        reason: reason.to_string(),
    })
}
