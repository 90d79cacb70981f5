//! Knowledge Component node.

use serde::{Deserialize, Serialize};

/// A Knowledge Component in the descendance graph.
///
/// `id` is the primary key. `number` is the display key shown to users; it is
/// expected to be unique but the graph does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KcNode {
    pub id: String,
    pub number: String,
    #[serde(default)]
    pub description: String,
}

impl KcNode {
    pub fn new(id: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Label for display: the Number, or the ID when the Number is blank.
    pub fn label(&self) -> &str {
        if self.number.is_empty() { &self.id } else { &self.number }
    }

    /// Hover text: the description, or `KC <number>` when there is none.
    pub fn tooltip(&self) -> String {
        if self.description.is_empty() {
            format!("KC {}", self.label())
        } else {
            self.description.clone()
        }
    }
}

/// Structural role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// No antecedents (in-degree 0).
    Source,
    /// No descendants (out-degree 0).
    Sink,
    Intermediate,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Source => f.write_str("source"),
            NodeKind::Sink => f.write_str("sink"),
            NodeKind::Intermediate => f.write_str("intermediate"),
        }
    }
}
