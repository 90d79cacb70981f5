//! Input row as handed over by the tabular reader.

use serde::{Deserialize, Serialize};

/// One parsed row of KC data.
///
/// Field names follow the spreadsheet headers so a CSV or JSON reader can
/// deserialize rows directly. `Short Description` may be missing entirely.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KcRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Number")]
    pub number: String,
    /// Comma-separated Numbers of prerequisite KCs.
    #[serde(rename = "Antecedents", default)]
    pub antecedents: String,
    #[serde(rename = "Short Description", default)]
    pub description: String,
}

impl KcRecord {
    pub fn new(id: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            ..Self::default()
        }
    }

    pub fn with_antecedents(mut self, antecedents: impl Into<String>) -> Self {
        self.antecedents = antecedents.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Antecedent tokens, trimmed, blanks dropped.
    pub fn antecedent_tokens(&self) -> impl Iterator<Item = &str> {
        self.antecedents
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
