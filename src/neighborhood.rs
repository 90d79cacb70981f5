//! Single-hop neighborhoods.
//!
//! The neighborhood of a KC is the descendance graph of the set made of the
//! KC itself, its immediate antecedents and its immediate descendants. It is
//! the subgraph *induced* on that set: two neighbors that happen to be
//! adjacent keep their edge even when neither is a focal node.

use hashbrown::HashSet;
use serde::Serialize;

use crate::graph::DescendanceGraph;

/// Neighborhood of one or more focal KCs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighborhood {
    #[serde(skip)]
    pub graph: DescendanceGraph,
    /// Focal IDs found in the source graph, in request order.
    pub focal: Vec<String>,
    /// Focal IDs absent from the source graph.
    pub missing: Vec<String>,
}

impl Neighborhood {
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Display labels of the focal nodes (Number, else ID).
    pub fn focal_labels(&self) -> Vec<&str> {
        self.focal
            .iter()
            .map(|id| self.graph.node(id).map_or(id.as_str(), |n| n.label()))
            .collect()
    }

    /// `Neighborhood of KC 4` or `Neighborhood of KCs: 4, 7`.
    pub fn title(&self) -> String {
        match self.focal_labels().as_slice() {
            [one] => format!("Neighborhood of KC {one}"),
            labels => format!("Neighborhood of KCs: {}", labels.join(", ")),
        }
    }

    /// File name stem such as `kc_neighborhood_1_2_4`.
    pub fn file_stem(&self) -> String {
        let labels = self.focal_labels();
        if labels.is_empty() {
            return "kc_neighborhood".to_string();
        }
        format!("kc_neighborhood_{}", labels.join("_").replace('.', "_"))
    }
}

/// Stateless extractor; see the module docs for the exact semantics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborhoodExtractor;

impl NeighborhoodExtractor {
    pub fn extract<I, S>(graph: &DescendanceGraph, focal_ids: I) -> Neighborhood
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members: HashSet<String> = HashSet::new();
        let mut focal = Vec::new();
        let mut missing = Vec::new();

        for id in focal_ids {
            let id = id.as_ref();
            if !graph.contains(id) {
                tracing::warn!(kc = id, "KC not found in graph");
                missing.push(id.to_string());
                continue;
            }

            let antecedents: Vec<&str> = graph.predecessors(id).collect();
            let descendants: Vec<&str> = graph.successors(id).collect();
            tracing::debug!(
                kc = id,
                number = graph.node(id).map_or(id, |n| n.label()),
                antecedents = ?labels(graph, &antecedents),
                descendants = ?labels(graph, &descendants),
                "neighborhood"
            );

            members.insert(id.to_string());
            members.extend(antecedents.iter().map(|s| s.to_string()));
            members.extend(descendants.iter().map(|s| s.to_string()));
            if !focal.iter().any(|f| f == id) {
                focal.push(id.to_string());
            }
        }

        let sub = graph.induced_subgraph(&members);
        tracing::debug!(
            nodes = sub.node_count(),
            edges = sub.edge_count(),
            "neighborhood extracted"
        );
        Neighborhood { graph: sub, focal, missing }
    }
}

fn labels<'a>(graph: &'a DescendanceGraph, ids: &[&'a str]) -> Vec<&'a str> {
    ids.iter()
        .map(|&id| graph.node(id).map_or(id, |n| n.label()))
        .collect()
}
