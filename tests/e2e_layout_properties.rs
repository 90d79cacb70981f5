//! Property-based invariants over random acyclic KC tables.
//!
//! 1. Layers follow the longest-path recurrence.
//! 2. Every node of a layer shares one x, `layer * spacing.x`.
//! 3. Each layer's extremes straddle y = 0.
//! 4. Siblings of one group get distinct, evenly spaced y values.
//! 5. A group placed next to earlier groups of its layer keeps
//!    `min_group_gap` from them whenever the search window held a free spot.
//! 6. Filtering isolated KCs is idempotent.
//! 7. A neighborhood is the induced subgraph on focal ∪ antecedents ∪ descendants.
//! 8. Numbers and IDs resolve to the same node.
//! 9. Layout does not depend on row order.

use std::collections::BTreeSet;

use kc_graph::{
    DescendanceGraph, KcGraph, KcRecord, LayoutConfig, NeighborhoodExtractor, SiblingGroup,
    filter_isolated,
};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

// ============================================================================
// Helpers
// ============================================================================

/// Up to 14 KCs; edges only run from a lower to a higher index, so the table
/// is acyclic.
fn table_strategy() -> impl Strategy<Value = Vec<KcRecord>> {
    (1usize..14)
        .prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..n * 2)))
        .prop_map(|(n, pairs)| {
            let mut antecedents: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
            for (a, b) in pairs {
                if a < b {
                    antecedents[b].insert(a);
                }
            }
            (0..n)
                .map(|i| {
                    let ants: Vec<String> = antecedents[i].iter().map(|a| number(*a)).collect();
                    KcRecord::new(id(i), number(i)).with_antecedents(ants.join(", "))
                })
                .collect()
        })
}

fn id(i: usize) -> String {
    format!("KC-{i:02}")
}

fn number(i: usize) -> String {
    format!("{}.{}", i / 4 + 1, i % 4)
}

fn edge_set(graph: &DescendanceGraph) -> BTreeSet<(String, String)> {
    graph
        .edges()
        .iter()
        .map(|e| (e.antecedent.clone(), e.descendant.clone()))
        .collect()
}

// ============================================================================
// 1-4. Layout geometry
// ============================================================================

proptest! {
    #[test]
    fn layers_follow_longest_path(records in table_strategy()) {
        let view = KcGraph::from_records(&records).overview().unwrap();
        for id in view.graph.node_ids() {
            let expected = view
                .graph
                .predecessors(id)
                .filter_map(|p| view.layout.layer_of(p))
                .max()
                .map_or(0, |l| l + 1);
            prop_assert_eq!(view.layout.layer_of(id), Some(expected), "layer of {}", id);
        }
    }

    #[test]
    fn layer_shares_one_x(records in table_strategy()) {
        let view = KcGraph::from_records(&records).overview().unwrap();
        for (id, pos) in &view.layout.positions {
            let layer = view.layout.layer_of(id).unwrap();
            prop_assert!((pos.x - layer as f64 * view.layout.spacing.x).abs() < EPS);
        }
    }

    #[test]
    fn layers_are_centered(records in table_strategy()) {
        let view = KcGraph::from_records(&records).overview().unwrap();
        for layer in 0..view.layout.layer_count() {
            let ys: Vec<f64> = view
                .layout
                .nodes_in_layer(layer)
                .iter()
                .map(|id| view.layout.position(id).unwrap().y)
                .collect();
            let max = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = ys.iter().copied().fold(f64::INFINITY, f64::min);
            prop_assert!(((max + min) / 2.0).abs() < 1e-6, "layer {} ys {:?}", layer, ys);
        }
    }

    #[test]
    fn siblings_are_evenly_spaced(records in table_strategy()) {
        let view = KcGraph::from_records(&records).overview().unwrap();
        let gap = view.layout.spacing.sibling_gap;
        for group in &view.layout.groups {
            let ys: Vec<f64> = group
                .members
                .iter()
                .map(|id| view.layout.position(id).unwrap().y)
                .collect();
            for pair in ys.windows(2) {
                prop_assert!((pair[1] - pair[0] - gap).abs() < 1e-6, "group {:?} ys {:?}", group, ys);
            }
        }
    }
}

// ============================================================================
// 5. Collision avoidance
// ============================================================================

proptest! {
    #[test]
    fn groups_keep_min_gap_when_window_allows(records in table_strategy()) {
        let view = KcGraph::from_records(&records).overview().unwrap();
        let layout = &view.layout;
        let spacing = layout.spacing;
        let offsets: Vec<f64> = LayoutConfig::default().search_offsets().collect();
        let y = |id: &str| layout.position(id).unwrap().y;

        for layer in 1..layout.layer_count() {
            let groups: Vec<&SiblingGroup> = layout.groups.iter().filter(|g| g.layer == layer).collect();
            // The first group never collides, so it pins down the layer's recentering shift.
            let mut layer_shift: Option<f64> = None;
            let mut placed: Vec<f64> = Vec::new();

            for group in groups {
                let target = group.parents.iter().map(|p| y(p.as_str())).sum::<f64>() / group.parents.len() as f64;
                let span = (group.members.len() - 1) as f64 * spacing.sibling_gap;
                let ys: Vec<f64> = group.members.iter().map(|m| y(m.as_str())).collect();
                let shift = *layer_shift.get_or_insert(ys[0] - (target - span / 2.0));
                let natural = target - span / 2.0 + shift;

                let window_has_room = offsets.iter().any(|offset| {
                    (0..group.members.len()).all(|i| {
                        let candidate = natural + offset + i as f64 * spacing.sibling_gap;
                        placed.iter().all(|u| (candidate - u).abs() >= spacing.min_group_gap + 1e-6)
                    })
                });
                if window_has_room {
                    for &m in &ys {
                        for &u in &placed {
                            prop_assert!(
                                (m - u).abs() >= spacing.min_group_gap - 1e-6,
                                "layer {} group {:?}: y {} within {} of {}",
                                layer, group.members, m, spacing.min_group_gap, u
                            );
                        }
                    }
                }
                placed.extend(ys);
            }
        }
    }
}

// ============================================================================
// 6. Filtering
// ============================================================================

proptest! {
    #[test]
    fn filter_isolated_is_idempotent(records in table_strategy()) {
        let kc = KcGraph::from_records(&records);
        let once = filter_isolated(kc.graph()).into_owned();
        let twice = filter_isolated(&once);

        prop_assert_eq!(twice.removed_count(), 0);
        prop_assert_eq!(twice.graph.node_count(), once.node_count());
        for id in once.node_ids() {
            prop_assert!(once.in_degree(id) + once.out_degree(id) > 0);
        }
    }
}

// ============================================================================
// 7. Neighborhoods
// ============================================================================

proptest! {
    #[test]
    fn neighborhood_is_induced(records in table_strategy(), pick in any::<prop::sample::Index>()) {
        let kc = KcGraph::from_records(&records);
        let graph = kc.graph();
        let ids: Vec<&str> = graph.node_ids().collect();
        let focal = ids[pick.index(ids.len())];

        let hood = NeighborhoodExtractor::extract(graph, [focal]);

        let mut expected: BTreeSet<String> = BTreeSet::new();
        expected.insert(focal.to_string());
        expected.extend(graph.predecessors(focal).map(str::to_string));
        expected.extend(graph.successors(focal).map(str::to_string));
        let got: BTreeSet<String> = hood.graph.node_ids().map(str::to_string).collect();
        prop_assert_eq!(&got, &expected);

        let expected_edges: BTreeSet<(String, String)> = edge_set(graph)
            .into_iter()
            .filter(|(a, d)| expected.contains(a) && expected.contains(d))
            .collect();
        prop_assert_eq!(edge_set(&hood.graph), expected_edges);
    }
}

// ============================================================================
// 8-9. Resolution and determinism
// ============================================================================

proptest! {
    #[test]
    fn numbers_and_ids_agree(records in table_strategy()) {
        let kc = KcGraph::from_records(&records);
        for rec in &records {
            prop_assert_eq!(kc.resolve(&rec.number), Some(rec.id.as_str()));
            prop_assert_eq!(kc.resolve(&rec.id), Some(rec.id.as_str()));
            prop_assert_eq!(kc.resolver().display_label(&rec.id), rec.number.as_str());
        }
    }

    #[test]
    fn layout_ignores_row_order(records in table_strategy()) {
        let forward = KcGraph::from_records(&records).overview().unwrap();
        let reversed: Vec<KcRecord> = records.iter().rev().cloned().collect();
        let backward = KcGraph::from_records(&reversed).overview().unwrap();

        prop_assert_eq!(edge_set(&forward.graph), edge_set(&backward.graph));
        prop_assert_eq!(forward.layout, backward.layout);
    }
}
