//! Longest-path layering.
//!
//! `layer(n) = 0` for a node without antecedents, otherwise
//! `1 + max(layer(p))` over its direct antecedents. Computed in topological
//! order, so every antecedent is final before its descendants are visited.

use std::collections::BTreeMap;

use crate::graph::DescendanceGraph;
use crate::graph::cycles::sorted_indices;
use crate::Result;

/// Layer assignment over node indices.
#[derive(Debug, Clone, Default)]
pub(crate) struct Layering {
    pub layer_of: Vec<usize>,
    /// `buckets[l]` holds the nodes of layer `l` in topological order.
    pub buckets: Vec<Vec<usize>>,
}

impl Layering {
    pub fn max_layer(&self) -> usize {
        self.buckets.len().saturating_sub(1)
    }
}

pub(crate) fn compute(graph: &DescendanceGraph) -> Result<Layering> {
    let order = sorted_indices(graph)?;

    let mut layer_of = vec![0usize; graph.node_count()];
    let mut buckets: Vec<Vec<usize>> = Vec::new();
    for node in order {
        let layer = graph
            .preds_of(node)
            .iter()
            .map(|&p| layer_of[p] + 1)
            .max()
            .unwrap_or(0);
        layer_of[node] = layer;
        if buckets.len() <= layer {
            buckets.resize_with(layer + 1, Vec::new);
        }
        buckets[layer].push(node);
    }

    Ok(Layering { layer_of, buckets })
}

/// Layer of every node, keyed by ID. Fails with
/// [`Error::CycleDetected`](crate::Error::CycleDetected) on cyclic input.
pub fn assign_layers(graph: &DescendanceGraph) -> Result<BTreeMap<String, usize>> {
    let layering = compute(graph)?;
    Ok(layering
        .layer_of
        .iter()
        .enumerate()
        .map(|(i, &l)| (graph.id_at(i).to_string(), l))
        .collect())
}
