//! Source / sink / intermediate classification and isolated-node filtering.

use std::borrow::Cow;

use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use crate::model::NodeKind;
use super::DescendanceGraph;

/// Partition of a graph's nodes by structural role, each list in node order.
///
/// A node with neither in- nor out-edges lands in both `sources` and `sinks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub sources: Vec<String>,
    pub sinks: Vec<String>,
    pub intermediate: Vec<String>,
}

impl Classification {
    pub fn of(graph: &DescendanceGraph) -> Self {
        let mut out = Self::default();
        for id in graph.node_ids() {
            let is_source = graph.in_degree(id) == 0;
            let is_sink = graph.out_degree(id) == 0;
            if is_source {
                out.sources.push(id.to_string());
            }
            if is_sink {
                out.sinks.push(id.to_string());
            }
            if !is_source && !is_sink {
                out.intermediate.push(id.to_string());
            }
        }
        out
    }

    /// Role used for coloring. Source wins over sink for isolated nodes.
    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        if self.sources.iter().any(|s| s == id) {
            Some(NodeKind::Source)
        } else if self.sinks.iter().any(|s| s == id) {
            Some(NodeKind::Sink)
        } else if self.intermediate.iter().any(|s| s == id) {
            Some(NodeKind::Intermediate)
        } else {
            None
        }
    }

    /// Role of every classified node, for bulk lookups.
    pub fn kinds(&self) -> HashMap<&str, NodeKind> {
        let mut kinds = HashMap::with_capacity(self.sources.len() + self.sinks.len() + self.intermediate.len());
        let tagged = [
            (&self.intermediate, NodeKind::Intermediate),
            (&self.sinks, NodeKind::Sink),
            (&self.sources, NodeKind::Source),
        ];
        // Sources go last so they overwrite sinks.
        for (ids, kind) in tagged {
            kinds.extend(ids.iter().map(|id| (id.as_str(), kind)));
        }
        kinds
    }
}

/// Result of [`filter_isolated`].
#[derive(Debug, Clone)]
pub struct Filtered<'g> {
    /// Borrowed when nothing was removed.
    pub graph: Cow<'g, DescendanceGraph>,
    /// IDs of the removed nodes, in node order.
    pub removed: Vec<String>,
}

impl Filtered<'_> {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn into_owned(self) -> DescendanceGraph {
        self.graph.into_owned()
    }
}

/// Drop nodes with no antecedents and no descendants.
///
/// The input is never mutated. When no node is isolated the same graph is
/// handed back borrowed.
pub fn filter_isolated(graph: &DescendanceGraph) -> Filtered<'_> {
    let removed: Vec<String> = graph
        .node_ids()
        .filter(|id| graph.in_degree(id) == 0 && graph.out_degree(id) == 0)
        .map(str::to_string)
        .collect();

    if removed.is_empty() {
        return Filtered { graph: Cow::Borrowed(graph), removed };
    }

    tracing::info!(
        removed = removed.len(),
        "removed isolated KCs (no antecedents and no descendants)"
    );
    let filtered = {
        let drop: HashSet<&str> = removed.iter().map(String::as_str).collect();
        graph.subgraph(|n| !drop.contains(n.id.as_str()))
    };
    Filtered { graph: Cow::Owned(filtered), removed }
}
