//! # Layered Layout
//!
//! Deterministic left-to-right placement of a descendance graph.
//!
//! ## Pipeline
//!
//! 1. **Layering**: longest path from a source ([`layering`])
//! 2. **Spacing**: tier picked once by node count ([`config`])
//! 3. **Sibling grouping**: nodes of a layer sharing the exact same
//!    antecedent set form one group
//! 4. **Group ordering**: layer 0 by member IDs; later layers by the mean y
//!    of the antecedents, then member IDs
//! 5. **Placement**: groups centered on their antecedents, with collision
//!    avoidance ([`placement`])
//! 6. **Recentering**: each layer shifted so its extremes straddle y = 0
//! 7. **x**: `layer × x spacing`
//!
//! The result depends only on node IDs and edges: same graph, same layout.
//! Cyclic graphs are rejected with [`Error::CycleDetected`](crate::Error::CycleDetected).

pub mod config;
pub mod layering;
pub mod placement;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::graph::DescendanceGraph;
use crate::model::{Position, PositionMap};
use crate::Result;

pub use config::{LayoutConfig, Spacing, SpacingTier};
pub use layering::assign_layers;
pub use placement::{LayerPlacer, recenter_shift};

// ============================================================================
// Output
// ============================================================================

/// Nodes of one layer sharing an identical antecedent set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingGroup {
    pub layer: usize,
    /// Sorted antecedent IDs. Empty for layer 0.
    pub parents: Vec<String>,
    /// Sorted member IDs, in the order they were stacked.
    pub members: Vec<String>,
}

/// A computed layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub positions: PositionMap,
    pub layers: BTreeMap<String, usize>,
    /// Groups in placement order, layer by layer.
    pub groups: Vec<SiblingGroup>,
    pub spacing: Spacing,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn layer_of(&self, id: &str) -> Option<usize> {
        self.layers.get(id).copied()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.values().max().map_or(0, |&l| l + 1)
    }

    /// IDs in `layer`, sorted.
    pub fn nodes_in_layer(&self, layer: usize) -> Vec<&str> {
        self.layers
            .iter()
            .filter(|&(_, &l)| l == layer)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Computes [`Layout`]s with a fixed, validated [`LayoutConfig`].
#[derive(Debug, Clone, Default)]
pub struct LayeredLayoutEngine {
    config: LayoutConfig,
}

/// A sibling group while its layer is being placed.
struct PendingGroup<'g> {
    parents: SmallVec<[&'g str; 4]>,
    members: Vec<usize>,
    parent_mean: Option<f64>,
}

impl LayeredLayoutEngine {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self, graph: &DescendanceGraph) -> Result<Layout> {
        let layering = layering::compute(graph)?;
        let spacing = self.config.spacing_for(graph.node_count(), layering.max_layer())?;

        let mut y: Vec<Option<f64>> = vec![None; graph.node_count()];
        let mut layout = Layout { spacing, ..Layout::default() };

        for (layer, bucket) in layering.buckets.iter().enumerate() {
            let groups = self.ordered_groups(graph, layer, bucket, &y);
            let mut placer = LayerPlacer::new(spacing, self.config.search_offsets());
            let mut placed: Vec<(usize, f64)> = Vec::with_capacity(bucket.len());

            for group in &groups {
                let target = if layer > 0 && !group.parents.is_empty() {
                    group.parent_mean
                } else {
                    None
                };
                let ys = placer.place(group.members.len(), target);
                placed.extend(group.members.iter().copied().zip(ys));
            }

            let shift = recenter_shift(placer.used());
            let x = layer as f64 * spacing.x;
            for (node, node_y) in placed {
                let node_y = node_y + shift;
                y[node] = Some(node_y);
                let id = graph.id_at(node).to_string();
                layout.positions.insert(id.clone(), Position::new(x, node_y));
                layout.layers.insert(id, layer);
            }

            layout.groups.extend(groups.into_iter().map(|g| SiblingGroup {
                layer,
                parents: g.parents.iter().map(|p| p.to_string()).collect(),
                members: g.members.iter().map(|&m| graph.id_at(m).to_string()).collect(),
            }));

            tracing::trace!(layer, nodes = bucket.len(), x, "layer placed");
        }

        Ok(layout)
    }

    /// Group a layer's nodes by antecedent set and order the groups.
    fn ordered_groups<'g>(
        &self,
        graph: &'g DescendanceGraph,
        layer: usize,
        bucket: &[usize],
        y: &[Option<f64>],
    ) -> Vec<PendingGroup<'g>> {
        let mut slot: HashMap<SmallVec<[&'g str; 4]>, usize> = HashMap::new();
        let mut groups: Vec<PendingGroup<'g>> = Vec::new();

        for &node in bucket {
            let mut parents: SmallVec<[&'g str; 4]> =
                graph.preds_of(node).iter().map(|&p| graph.id_at(p)).collect();
            parents.sort_unstable();

            let idx = *slot.entry(parents.clone()).or_insert_with(|| {
                groups.push(PendingGroup { parents, members: Vec::new(), parent_mean: None });
                groups.len() - 1
            });
            groups[idx].members.push(node);
        }

        for group in &mut groups {
            group.members.sort_by(|&a, &b| graph.id_at(a).cmp(graph.id_at(b)));
            let parent_ys: Vec<f64> = group
                .parents
                .iter()
                .filter_map(|p| graph.index_of(p).and_then(|i| y[i]))
                .collect();
            if !parent_ys.is_empty() {
                group.parent_mean = Some(parent_ys.iter().sum::<f64>() / parent_ys.len() as f64);
            }
        }

        let by_members = |a: &PendingGroup<'_>, b: &PendingGroup<'_>| {
            a.members
                .iter()
                .map(|&m| graph.id_at(m))
                .cmp(b.members.iter().map(|&m| graph.id_at(m)))
        };

        if layer == 0 {
            groups.sort_by(by_members);
        } else {
            groups.sort_by(|a, b| {
                let ya = a.parent_mean.unwrap_or(0.0);
                let yb = b.parent_mean.unwrap_or(0.0);
                ya.partial_cmp(&yb)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| by_members(a, b))
            });
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KcNode;
    use crate::Error;

    const EPS: f64 = 1e-9;

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> DescendanceGraph {
        let mut g = DescendanceGraph::new();
        for id in ids {
            g.add_node(KcNode::new(*id, *id));
        }
        for (a, b) in edges {
            g.add_edge(a, b).unwrap();
        }
        g
    }

    fn y_of(layout: &Layout, id: &str) -> f64 {
        layout.position(id).unwrap().y
    }

    #[test]
    fn test_empty_graph_empty_layout() {
        let layout = LayeredLayoutEngine::default().layout(&DescendanceGraph::new()).unwrap();
        assert!(layout.is_empty());
        assert!(layout.groups.is_empty());
        assert_eq!(layout.layer_count(), 0);
    }

    #[test]
    fn test_single_node_at_origin() {
        let layout = LayeredLayoutEngine::default().layout(&graph(&["A"], &[])).unwrap();
        assert_eq!(layout.position("A"), Some(Position::new(0.0, 0.0)));
    }

    #[test]
    fn test_three_siblings_centered_on_parent() {
        let g = graph(&["P", "C1", "C2", "C3"], &[("P", "C1"), ("P", "C2"), ("P", "C3")]);
        let layout = LayeredLayoutEngine::default().layout(&g).unwrap();

        assert_eq!(layout.position("P"), Some(Position::new(0.0, 0.0)));
        // 4 nodes: sibling gap 0.4; two layers: x = max(2.0, 25 / 2)
        for (id, expected) in [("C1", -0.4), ("C2", 0.0), ("C3", 0.4)] {
            let pos = layout.position(id).unwrap();
            assert!((pos.y - expected).abs() < EPS, "{id}: {}", pos.y);
            assert_eq!(pos.x, 12.5);
        }
        assert_eq!(layout.groups.len(), 2);
        assert_eq!(layout.groups[1].parents, vec!["P"]);
        assert_eq!(layout.groups[1].members, vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn test_sources_share_one_group() {
        // Three sources, each with its own child
        let g = graph(
            &["A", "B", "C", "a", "b", "c"],
            &[("A", "a"), ("B", "b"), ("C", "c")],
        );
        let layout = LayeredLayoutEngine::default().layout(&g).unwrap();

        // Sources all have the empty antecedent set: one group, sibling gap 0.4.
        assert_eq!(layout.groups[0].members, vec!["A", "B", "C"]);
        assert!((y_of(&layout, "A") + 0.4).abs() < EPS);
        assert!(y_of(&layout, "B").abs() < EPS);
        assert!((y_of(&layout, "C") - 0.4).abs() < EPS);

        // a lands on its target -0.4; b (target 0) collides and the first
        // clear offset is -3.0; c (target 0.4) clears both at -1.85.
        // Recentering shifts the layer by 1.7.
        assert!((y_of(&layout, "a") - 1.3).abs() < EPS);
        assert!((y_of(&layout, "b") + 1.3).abs() < EPS);
        assert!((y_of(&layout, "c") + 0.15).abs() < EPS);
    }

    #[test]
    fn test_colliding_group_is_nudged() {
        let g = graph(
            &["P", "Q", "x", "y"],
            &[("P", "x"), ("P", "y"), ("Q", "y")],
        );
        let layout = LayeredLayoutEngine::default().layout(&g).unwrap();

        // layer 0: one group P, Q at 0 / 0.4, recentered to -0.2 / 0.2
        assert!((y_of(&layout, "P") + 0.2).abs() < EPS);
        assert!((y_of(&layout, "Q") - 0.2).abs() < EPS);
        // layer 1: x targets -0.2 and is placed first; y targets 0.0, which is
        // within the 1.0 group gap of x, so it moves to -3.0.
        // Recentering by -(-0.2 + -3.0) / 2 = 1.6.
        assert!((y_of(&layout, "x") - 1.4).abs() < EPS);
        assert!((y_of(&layout, "y") + 1.4).abs() < EPS);
        assert_eq!(layout.groups[1].members, vec!["x"]);
        assert_eq!(layout.groups[2].parents, vec!["P", "Q"]);
    }

    #[test]
    fn test_same_x_per_layer() {
        let g = graph(&["A", "B", "C", "D"], &[("A", "C"), ("B", "D"), ("C", "D")]);
        let layout = LayeredLayoutEngine::default().layout(&g).unwrap();
        assert_eq!(layout.layer_of("D"), Some(2));
        assert_eq!(layout.position("A").unwrap().x, layout.position("B").unwrap().x);
        assert_eq!(layout.nodes_in_layer(0), vec!["A", "B"]);
        assert_eq!(layout.layer_count(), 3);
    }

    #[test]
    fn test_cyclic_graph_rejected() {
        let g = graph(&["A", "B"], &[("A", "B"), ("B", "A")]);
        let err = LayeredLayoutEngine::default().layout(&g).unwrap_err();
        assert!(matches!(err, Error::CycleDetected { ref nodes } if nodes == &["A", "B"]));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut cfg = LayoutConfig::default();
        cfg.tiers.clear();
        assert!(LayeredLayoutEngine::new(cfg).is_err());
    }
}
