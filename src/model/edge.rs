//! Directed prerequisite edge.

use serde::{Deserialize, Serialize};

/// A directed edge `antecedent → descendant`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub antecedent: String,
    pub descendant: String,
}

impl Edge {
    pub fn new(antecedent: impl Into<String>, descendant: impl Into<String>) -> Self {
        Self {
            antecedent: antecedent.into(),
            descendant: descendant.into(),
        }
    }
}
