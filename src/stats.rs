//! Summary statistics of a (filtered) descendance graph.

use std::fmt;

use serde::Serialize;

use crate::graph::{Classification, DescendanceGraph, is_acyclic};

/// How many example IDs the summary keeps per category.
const EXAMPLE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub sources: usize,
    pub sinks: usize,
    pub intermediate: usize,
    pub is_acyclic: bool,
    pub example_sources: Vec<String>,
    pub example_sinks: Vec<String>,
}

impl GraphStats {
    pub fn compute(graph: &DescendanceGraph, classes: &Classification) -> Self {
        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            sources: classes.sources.len(),
            sinks: classes.sinks.len(),
            intermediate: classes.intermediate.len(),
            is_acyclic: is_acyclic(graph),
            example_sources: classes.sources.iter().take(EXAMPLE_LIMIT).cloned().collect(),
            example_sinks: classes.sinks.iter().take(EXAMPLE_LIMIT).cloned().collect(),
        }
    }

    /// Emit the summary at info level.
    pub fn log(&self) {
        tracing::info!(
            nodes = self.nodes,
            edges = self.edges,
            sources = self.sources,
            sinks = self.sinks,
            intermediate = self.intermediate,
            acyclic = self.is_acyclic,
            "graph statistics"
        );
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph Statistics:")?;
        writeln!(f, "  Total KCs: {}", self.nodes)?;
        writeln!(f, "  Total relationships: {}", self.edges)?;
        writeln!(f, "  Sources: {}", self.sources)?;
        writeln!(f, "  Sinks: {}", self.sinks)?;
        writeln!(f, "  Intermediate KCs: {}", self.intermediate)?;
        write!(f, "  Is acyclic: {}", self.is_acyclic)?;
        if !self.example_sources.is_empty() {
            write!(f, "\n  Example sources (first {EXAMPLE_LIMIT}): {}", self.example_sources.join(", "))?;
        }
        if !self.example_sinks.is_empty() {
            write!(f, "\n  Example sinks (first {EXAMPLE_LIMIT}): {}", self.example_sinks.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KcNode;

    #[test]
    fn test_counts_and_examples() {
        let mut g = DescendanceGraph::new();
        for i in 0..12 {
            g.add_node(KcNode::new(format!("S{i:02}"), i.to_string()));
        }
        g.add_node(KcNode::new("T", "99"));
        for i in 0..12 {
            g.add_edge(&format!("S{i:02}"), "T").unwrap();
        }

        let stats = GraphStats::compute(&g, &Classification::of(&g));
        assert_eq!(stats.nodes, 13);
        assert_eq!(stats.edges, 12);
        assert_eq!(stats.sources, 12);
        assert_eq!(stats.sinks, 1);
        assert_eq!(stats.intermediate, 0);
        assert!(stats.is_acyclic);
        assert_eq!(stats.example_sources.len(), EXAMPLE_LIMIT);
        assert_eq!(stats.example_sinks, vec!["T"]);

        let text = stats.to_string();
        assert!(text.starts_with("Graph Statistics:"));
        assert!(text.contains("Total relationships: 12"));
        assert!(text.contains("Is acyclic: true"));
    }

    #[test]
    fn test_empty_graph() {
        let g = DescendanceGraph::new();
        let stats = GraphStats::compute(&g, &Classification::of(&g));
        assert_eq!(stats.nodes, 0);
        assert!(stats.is_acyclic);
        assert!(!stats.to_string().contains("Example"));
    }
}
