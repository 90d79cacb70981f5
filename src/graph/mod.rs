//! # Descendance Graph
//!
//! The in-memory DAG of KCs. Edges run antecedent → descendant.
//!
//! Nodes keep insertion order and are unique by ID. Adjacency is stored per
//! node as small index vectors in both directions, so predecessor and
//! successor scans are O(degree).
//!
//! ## Invariants
//!
//! - Every edge endpoint is a node of the graph.
//! - No duplicate edges (adding one twice is a no-op).
//! - Acyclicity is NOT enforced here. Use [`cycles::is_acyclic`] before
//!   anything that needs a topological order.
//!
//! Graphs are never mutated once handed out: filtering and neighborhood
//! extraction build new graphs via [`DescendanceGraph::subgraph`].

pub mod builder;
pub mod classify;
pub mod cycles;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::model::{Edge, KcNode};
use crate::{Error, Result};

pub use builder::{BuildOutput, BuildWarning, GraphBuilder};
pub use classify::{Classification, Filtered, filter_isolated};
pub use cycles::{find_cycle, is_acyclic, topological_order};

type Adjacency = SmallVec<[usize; 4]>;

// ============================================================================
// DescendanceGraph
// ============================================================================

/// Directed graph of Knowledge Components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescendanceGraph {
    nodes: Vec<KcNode>,
    /// node id → position in `nodes`
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    preds: Vec<Adjacency>,
    succs: Vec<Adjacency>,
}

impl DescendanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. An existing node with the same ID gets its attributes
    /// replaced and keeps its place; returns `false` in that case.
    pub fn add_node(&mut self, node: KcNode) -> bool {
        if let Some(&idx) = self.index.get(&node.id) {
            self.nodes[idx] = node;
            return false;
        }
        let idx = self.nodes.len();
        self.index.insert(node.id.clone(), idx);
        self.nodes.push(node);
        self.preds.push(Adjacency::new());
        self.succs.push(Adjacency::new());
        true
    }

    /// Insert edge `antecedent → descendant`.
    ///
    /// Both endpoints must already exist. Returns `Ok(false)` for a duplicate.
    pub fn add_edge(&mut self, antecedent: &str, descendant: &str) -> Result<bool> {
        let src = self.index_of(antecedent)
            .ok_or_else(|| Error::NotFound(format!("Antecedent KC {antecedent}")))?;
        let dst = self.index_of(descendant)
            .ok_or_else(|| Error::NotFound(format!("Descendant KC {descendant}")))?;

        if self.succs[src].contains(&dst) {
            return Ok(false);
        }
        self.succs[src].push(dst);
        self.preds[dst].push(src);
        self.edges.push(Edge::new(antecedent, descendant));
        Ok(true)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&KcNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[KcNode] {
        &self.nodes
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn has_edge(&self, antecedent: &str, descendant: &str) -> bool {
        match (self.index_of(antecedent), self.index_of(descendant)) {
            (Some(src), Some(dst)) => self.succs[src].contains(&dst),
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Adjacency
    // ========================================================================

    /// Direct antecedents of `id`, in edge insertion order. Empty if unknown.
    pub fn predecessors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.neighbors(id, &self.preds)
    }

    /// Direct descendants of `id`, in edge insertion order. Empty if unknown.
    pub fn successors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.neighbors(id, &self.succs)
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.index_of(id).map_or(0, |i| self.preds[i].len())
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.index_of(id).map_or(0, |i| self.succs[i].len())
    }

    fn neighbors<'a>(&'a self, id: &str, adj: &'a [Adjacency]) -> impl Iterator<Item = &'a str> + use<'a> {
        let list: &'a [usize] = match self.index_of(id) {
            Some(i) => &adj[i],
            None => &[],
        };
        list.iter().map(move |&j| self.nodes[j].id.as_str())
    }

    // ========================================================================
    // Index-level access for the algorithms in this crate
    // ========================================================================

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn id_at(&self, idx: usize) -> &str {
        &self.nodes[idx].id
    }

    pub(crate) fn preds_of(&self, idx: usize) -> &[usize] {
        &self.preds[idx]
    }

    pub(crate) fn succs_of(&self, idx: usize) -> &[usize] {
        &self.succs[idx]
    }

    // ========================================================================
    // Derived graphs
    // ========================================================================

    /// New graph over the nodes accepted by `keep`, with every edge whose
    /// endpoints are both kept. Node and edge order are preserved.
    pub fn subgraph<F>(&self, mut keep: F) -> DescendanceGraph
    where
        F: FnMut(&KcNode) -> bool,
    {
        let mut out = DescendanceGraph::new();
        for node in &self.nodes {
            if keep(node) {
                out.add_node(node.clone());
            }
        }
        for edge in &self.edges {
            if out.contains(&edge.antecedent) && out.contains(&edge.descendant) {
                // Both endpoints exist and `self` holds no duplicates.
                let _ = out.add_edge(&edge.antecedent, &edge.descendant);
            }
        }
        out
    }

    /// Subgraph induced on `ids`. Unknown IDs are ignored.
    pub fn induced_subgraph(&self, ids: &HashSet<String>) -> DescendanceGraph {
        self.subgraph(|n| ids.contains(&n.id))
    }
}
