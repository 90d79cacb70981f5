//! Render document export: a laid-out graph serialized as JSON.
//!
//! The document carries everything a renderer needs and nothing it has to
//! recompute: labels, tooltips, node roles, layers and coordinates.
//!
//! ```text
//! GraphView → RenderDocument → to_json() / write_json()
//!   → bitmap renderer, HTML canvas, or any other consumer
//! ```

use std::io::Write;

use serde::Serialize;

use crate::graph::{Classification, DescendanceGraph};
use crate::layout::Layout;
use crate::model::{KcNode, NodeKind};
use crate::stats::GraphStats;
use crate::GraphView;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: String,
    pub number: String,
    pub description: String,
    pub tooltip: String,
    pub kind: NodeKind,
    pub layer: usize,
    pub x: f64,
    pub y: f64,
    /// in-degree + out-degree
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderEdge {
    pub source: String,
    pub target: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderDocument {
    pub title: String,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub stats: GraphStats,
    pub removed_isolated: Vec<String>,
}

impl RenderDocument {
    pub fn from_view(view: &GraphView) -> Self {
        Self::build(
            &view.title,
            &view.graph,
            &view.classification,
            &view.layout,
            &view.stats,
            &view.removed_isolated,
        )
    }

    pub fn build(
        title: &str,
        graph: &DescendanceGraph,
        classes: &Classification,
        layout: &Layout,
        stats: &GraphStats,
        removed_isolated: &[String],
    ) -> Self {
        let kinds = classes.kinds();
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| {
                let pos = layout.position(&node.id).unwrap_or_default();
                RenderNode {
                    id: node.id.clone(),
                    number: node.number.clone(),
                    description: node.description.clone(),
                    tooltip: node.tooltip(),
                    kind: kinds.get(node.id.as_str()).copied().unwrap_or(NodeKind::Intermediate),
                    layer: layout.layer_of(&node.id).unwrap_or(0),
                    x: pos.x,
                    y: pos.y,
                    degree: graph.in_degree(&node.id) + graph.out_degree(&node.id),
                }
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| RenderEdge {
                source: edge.antecedent.clone(),
                target: edge.descendant.clone(),
                tooltip: format!(
                    "From: {}\nTo: {}",
                    tooltip_of(graph.node(&edge.antecedent), &edge.antecedent),
                    tooltip_of(graph.node(&edge.descendant), &edge.descendant),
                ),
            })
            .collect();

        Self {
            title: title.to_string(),
            nodes,
            edges,
            stats: stats.clone(),
            removed_isolated: removed_isolated.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

fn tooltip_of(node: Option<&KcNode>, id: &str) -> String {
    node.map_or_else(|| format!("KC {id}"), KcNode::tooltip)
}
