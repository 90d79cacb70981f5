//! Records → descendance graph.
//!
//! Two passes over the input:
//!
//! 1. bind every Number ⇄ ID pair into the [`IdentifierResolver`]
//! 2. resolve each record's antecedent tokens and add `antecedent → record` edges
//!
//! Nothing here fails. Unusable rows and unresolvable tokens are dropped
//! individually, logged, and returned as [`BuildWarning`]s.

use std::fmt;

use hashbrown::HashMap;
use serde::Serialize;

use crate::model::{KcNode, KcRecord};
use crate::resolve::IdentifierResolver;
use super::DescendanceGraph;

/// A non-fatal problem found while building the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildWarning {
    /// Row lacks an ID or a Number and contributes nothing.
    IncompleteRecord { row: usize, id: String, number: String },
    /// A later row reused a Number; `id` now owns it.
    DuplicateNumber { number: String, previous_id: String, id: String },
    /// Antecedent token matches no Number; that single edge is dropped.
    UnresolvedAntecedent { descendant: String, token: String },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::IncompleteRecord { row, id, number } => {
                write!(f, "row {row} skipped: ID '{id}' / Number '{number}' incomplete")
            }
            BuildWarning::DuplicateNumber { number, previous_id, id } => {
                write!(f, "Number '{number}' reassigned from KC '{previous_id}' to KC '{id}'")
            }
            BuildWarning::UnresolvedAntecedent { descendant, token } => {
                write!(f, "Antecedent number '{token}' for KC '{descendant}' not found in data")
            }
        }
    }
}

/// Everything produced by one builder run.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub graph: DescendanceGraph,
    pub resolver: IdentifierResolver,
    pub warnings: Vec<BuildWarning>,
}

impl BuildOutput {
    /// Tokens that failed to resolve, as `(descendant, token)` pairs.
    pub fn unresolved_antecedents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.warnings.iter().filter_map(|w| match w {
            BuildWarning::UnresolvedAntecedent { descendant, token } => {
                Some((descendant.as_str(), token.as_str()))
            }
            _ => None,
        })
    }
}

/// Assembles a [`DescendanceGraph`] from parsed records.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    resolver: IdentifierResolver,
    /// IDs of complete rows in first-seen order; fixes node order in the graph.
    id_order: Vec<String>,
    descriptions: HashMap<String, String>,
    warnings: Vec<BuildWarning>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `records` in one call.
    pub fn build(records: &[KcRecord]) -> BuildOutput {
        let mut builder = Self::new();
        builder.bind_identifiers(records);
        let mut graph = builder.create_nodes();
        builder.resolve_edges(records, &mut graph);

        let GraphBuilder { resolver, warnings, .. } = builder;
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            warnings = warnings.len(),
            "descendance graph built"
        );
        BuildOutput { graph, resolver, warnings }
    }

    // ========================================================================
    // Pass 1: identifier maps
    // ========================================================================

    fn bind_identifiers(&mut self, records: &[KcRecord]) {
        for (row, rec) in records.iter().enumerate() {
            let id = rec.id.trim();
            let number = rec.number.trim();

            if id.is_empty() || number.is_empty() {
                tracing::warn!(row, id, number, "KC row without ID or Number skipped");
                self.warnings.push(BuildWarning::IncompleteRecord {
                    row,
                    id: id.to_string(),
                    number: number.to_string(),
                });
                continue;
            }

            if !self.resolver.contains_id(id) {
                self.id_order.push(id.to_string());
            }
            if let Some(previous_id) = self.resolver.bind_number(number, id) {
                tracing::warn!(number, previous = %previous_id, id, "duplicate KC Number, last row wins");
                self.warnings.push(BuildWarning::DuplicateNumber {
                    number: number.to_string(),
                    previous_id,
                    id: id.to_string(),
                });
            }
            self.resolver.bind_id(id, number);

            let description = rec.description.trim();
            if !description.is_empty() {
                self.descriptions.insert(id.to_string(), description.to_string());
            }
        }
    }

    fn create_nodes(&self) -> DescendanceGraph {
        let mut graph = DescendanceGraph::new();
        for id in &self.id_order {
            let node = KcNode::new(id, self.resolver.display_label(id))
                .with_description(self.descriptions.get(id).cloned().unwrap_or_default());
            graph.add_node(node);
        }
        graph
    }

    // ========================================================================
    // Pass 2: edges
    // ========================================================================

    fn resolve_edges(&mut self, records: &[KcRecord], graph: &mut DescendanceGraph) {
        for rec in records {
            let descendant = rec.id.trim();
            if descendant.is_empty() || rec.number.trim().is_empty() {
                continue;
            }

            for token in rec.antecedent_tokens() {
                let Some(antecedent) = self.resolver.id_of(token) else {
                    tracing::warn!(token, kc = descendant, "antecedent number not found in data");
                    self.warnings.push(BuildWarning::UnresolvedAntecedent {
                        descendant: descendant.to_string(),
                        token: token.to_string(),
                    });
                    continue;
                };

                // Every complete row is a node, so both endpoints exist.
                let _ = graph.add_edge(antecedent, descendant);
            }
        }
    }
}
