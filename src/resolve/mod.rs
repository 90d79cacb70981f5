//! # Identifier Resolution
//!
//! Users and spreadsheets refer to KCs by their display Number (`"1.2"`,
//! `"411"`), while the graph is keyed by the internal ID. The resolver owns
//! both directions of that mapping and turns an ambiguous token into a node ID.
//!
//! Lookup order for a token (after trimming):
//!
//! 1. as a Number in `number_to_id`
//! 2. as an ID in `id_to_number`
//! 3. not found
//!
//! No fuzzy matching and no case folding.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Bidirectional Number ⇄ ID mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierResolver {
    number_to_id: HashMap<String, String>,
    id_to_number: HashMap<String, String>,
}

/// Outcome of resolving a list of tokens, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub resolved: Vec<String>,
    pub unresolved: Vec<String>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

impl IdentifierResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a Number → ID mapping.
    ///
    /// Returns the ID previously bound to `number` when it differed, so the
    /// caller can report the overwrite. Last write wins.
    pub fn bind_number(&mut self, number: impl Into<String>, id: impl Into<String>) -> Option<String> {
        let id = id.into();
        match self.number_to_id.insert(number.into(), id.clone()) {
            Some(prev) if prev != id => Some(prev),
            _ => None,
        }
    }

    /// Register an ID → Number mapping.
    pub fn bind_id(&mut self, id: impl Into<String>, number: impl Into<String>) {
        self.id_to_number.insert(id.into(), number.into());
    }

    /// Resolve a Number-or-ID token to a node ID.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        let token = token.trim();
        if let Some(id) = self.number_to_id.get(token) {
            return Some(id);
        }
        self.id_to_number
            .get_key_value(token)
            .map(|(id, _)| id.as_str())
    }

    /// Resolve each token, keeping resolved IDs and misses in input order.
    pub fn resolve_all<I, S>(&self, tokens: I) -> Resolution
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Resolution::default();
        for token in tokens {
            let token = token.as_ref();
            match self.resolve(token) {
                Some(id) => out.resolved.push(id.to_string()),
                None => {
                    tracing::warn!(token = token.trim(), "could not find KC");
                    out.unresolved.push(token.trim().to_string());
                }
            }
        }
        out
    }

    /// ID bound to a Number, without the ID fallback of [`resolve`](Self::resolve).
    pub fn id_of(&self, number: &str) -> Option<&str> {
        self.number_to_id.get(number.trim()).map(String::as_str)
    }

    pub fn number_of(&self, id: &str) -> Option<&str> {
        self.id_to_number.get(id).map(String::as_str)
    }

    /// The Number for `id`, falling back to the ID itself.
    pub fn display_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.number_of(id).unwrap_or(id)
    }

    pub fn contains_number(&self, number: &str) -> bool {
        self.number_to_id.contains_key(number)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.id_to_number.contains_key(id)
    }
}

/// Split a comma-separated identifier list such as `"1.1, 1.2"`.
pub fn parse_identifier_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
