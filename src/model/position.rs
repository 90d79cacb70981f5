//! 2-D placement produced by the layout engine.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// A point in layout space. `x` grows with the layer, `y` is centered per layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node ID → position, ordered by ID so iteration is deterministic.
pub type PositionMap = BTreeMap<String, Position>;
