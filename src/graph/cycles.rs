//! Topological ordering and cycle detection.
//!
//! The graph is mirrored into a petgraph `DiGraph` whose node weights are
//! positions in [`DescendanceGraph::nodes`], so algorithm output maps straight
//! back to node indices. Cycles are reported per strongly connected
//! component: every component with more than one node, or a single node with
//! a self-loop, lies on a cycle.

use petgraph::algo::{is_cyclic_directed, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::{Error, Result};
use super::DescendanceGraph;

type IndexGraph = DiGraph<usize, ()>;

/// Index-level mirror of `graph`. `NodeIndex::new(i)` is node `i`.
fn index_graph(graph: &DescendanceGraph) -> IndexGraph {
    let n = graph.node_count();
    let mut dag = IndexGraph::with_capacity(n, graph.edge_count());
    for i in 0..n {
        dag.add_node(i);
    }
    for i in 0..n {
        for &next in graph.succs_of(i) {
            dag.add_edge(NodeIndex::new(i), NodeIndex::new(next), ());
        }
    }
    dag
}

/// Node indices in a topological order, or [`Error::CycleDetected`].
pub(crate) fn sorted_indices(graph: &DescendanceGraph) -> Result<Vec<usize>> {
    let dag = index_graph(graph);
    match toposort(&dag, None) {
        Ok(order) => Ok(order.into_iter().map(|ix| dag[ix]).collect()),
        Err(_) => Err(cycle_error(graph, &dag)),
    }
}

/// Node IDs in a topological order, or [`Error::CycleDetected`].
pub fn topological_order(graph: &DescendanceGraph) -> Result<Vec<&str>> {
    Ok(sorted_indices(graph)?
        .into_iter()
        .map(|i| graph.id_at(i))
        .collect())
}

pub fn is_acyclic(graph: &DescendanceGraph) -> bool {
    !is_cyclic_directed(&index_graph(graph))
}

/// One cycle as a closed walk (first ID repeated at the end), if any exists.
///
/// Walks the cyclic component holding the lowest node index, starting there.
pub fn find_cycle(graph: &DescendanceGraph) -> Option<Vec<String>> {
    let dag = index_graph(graph);
    let component = cyclic_components(&dag)
        .into_iter()
        .min_by_key(|c| c.iter().copied().min())?;
    let &start = component.iter().min()?;

    let mut in_component = vec![false; graph.node_count()];
    for &i in &component {
        in_component[i] = true;
    }

    // Inside a strongly connected component every node keeps a successor in
    // the component, so the walk revisits a node within |component| steps.
    let mut seen_at = vec![usize::MAX; graph.node_count()];
    let mut walk = vec![start];
    seen_at[start] = 0;
    let mut current = start;
    loop {
        let next = *graph.succs_of(current).iter().find(|&&s| in_component[s])?;
        if seen_at[next] != usize::MAX {
            let mut cycle: Vec<String> = walk[seen_at[next]..]
                .iter()
                .map(|&i| graph.id_at(i).to_string())
                .collect();
            cycle.push(graph.id_at(next).to_string());
            return Some(cycle);
        }
        seen_at[next] = walk.len();
        walk.push(next);
        current = next;
    }
}

/// Components of `dag` that contain a cycle, as node indices.
fn cyclic_components(dag: &IndexGraph) -> Vec<Vec<usize>> {
    tarjan_scc(dag)
        .into_iter()
        .filter(|c| c.len() > 1 || c.iter().any(|&ix| dag.contains_edge(ix, ix)))
        .map(|c| c.into_iter().map(|ix| dag[ix]).collect())
        .collect()
}

/// Every node lying on a cycle, sorted by ID.
fn cycle_error(graph: &DescendanceGraph, dag: &IndexGraph) -> Error {
    let mut nodes: Vec<String> = cyclic_components(dag)
        .into_iter()
        .flatten()
        .map(|i| graph.id_at(i).to_string())
        .collect();
    nodes.sort();
    Error::CycleDetected { nodes }
}
