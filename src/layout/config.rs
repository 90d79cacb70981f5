//! Layout tuning: spacing tiers and the collision search window.
//!
//! Defaults reproduce the stock tiers:
//!
//! | nodes | x floor | min group gap | sibling gap |
//! |-------|---------|---------------|-------------|
//! | ≤ 10  | 2.0     | 1.0           | 0.4         |
//! | ≤ 25  | 2.5     | 1.5           | 0.45        |
//! | > 25  | 4.0     | 2.5           | 0.5         |

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Upper bound on offsets tried per side of the collision search.
pub const MAX_SEARCH_STEPS: f64 = 10_000.0;

/// Spacing used for graphs up to `max_nodes` nodes (`None` = no upper bound).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingTier {
    pub max_nodes: Option<usize>,
    pub x_floor: f64,
    pub min_group_gap: f64,
    pub sibling_gap: f64,
}

impl SpacingTier {
    fn admits(&self, node_count: usize) -> bool {
        self.max_nodes.is_none_or(|max| node_count <= max)
    }
}

/// Spacing resolved for one graph.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spacing {
    /// Distance between consecutive layers.
    pub x: f64,
    /// Minimum vertical distance between a new group and already placed nodes.
    pub min_group_gap: f64,
    /// Vertical distance between siblings of one group.
    pub sibling_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Checked in order; the first tier admitting the node count wins.
    pub tiers: Vec<SpacingTier>,
    /// Total horizontal extent the layers are stretched to, when that beats
    /// the tier's x floor.
    pub target_width: f64,
    /// Collision search scans offsets in `[-search_radius, +search_radius]`.
    pub search_radius: f64,
    pub search_step: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                SpacingTier { max_nodes: Some(10), x_floor: 2.0, min_group_gap: 1.0, sibling_gap: 0.4 },
                SpacingTier { max_nodes: Some(25), x_floor: 2.5, min_group_gap: 1.5, sibling_gap: 0.45 },
                SpacingTier { max_nodes: None, x_floor: 4.0, min_group_gap: 2.5, sibling_gap: 0.5 },
            ],
            target_width: 25.0,
            search_radius: 3.0,
            search_step: 0.25,
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let Some(last) = self.tiers.last() else {
            return Err(Error::InvalidConfig("at least one spacing tier is required".into()));
        };
        if last.max_nodes.is_some() {
            return Err(Error::InvalidConfig("the last spacing tier must have no max_nodes".into()));
        }
        let bounds: Vec<usize> = self.tiers.iter().filter_map(|t| t.max_nodes).collect();
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidConfig("tier max_nodes must be strictly increasing".into()));
        }
        for (i, tier) in self.tiers.iter().enumerate() {
            let positive = [tier.x_floor, tier.min_group_gap, tier.sibling_gap];
            if positive.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
                return Err(Error::InvalidConfig(format!("tier {i}: spacings must be positive")));
            }
        }
        if !(self.target_width.is_finite() && self.target_width >= 0.0) {
            return Err(Error::InvalidConfig("target_width must be a non-negative number".into()));
        }
        if !(self.search_step.is_finite() && self.search_step > 0.0) {
            return Err(Error::InvalidConfig("search_step must be positive".into()));
        }
        if !(self.search_radius.is_finite() && self.search_radius >= 0.0) {
            return Err(Error::InvalidConfig("search_radius must be non-negative".into()));
        }
        if self.search_radius / self.search_step > MAX_SEARCH_STEPS {
            return Err(Error::InvalidConfig(format!(
                "search_radius / search_step must not exceed {MAX_SEARCH_STEPS}"
            )));
        }
        Ok(())
    }

    pub fn tier_for(&self, node_count: usize) -> Option<&SpacingTier> {
        self.tiers
            .iter()
            .find(|t| t.admits(node_count))
            .or(self.tiers.last())
    }

    /// Resolve spacing for a graph of `node_count` nodes and `max_layer + 1` layers.
    pub fn spacing_for(&self, node_count: usize, max_layer: usize) -> Result<Spacing> {
        let tier = self.tier_for(node_count)
            .ok_or_else(|| Error::InvalidConfig("no spacing tiers".into()))?;
        let x = if max_layer > 0 {
            tier.x_floor.max(self.target_width / (max_layer + 1) as f64)
        } else {
            tier.x_floor
        };
        Ok(Spacing {
            x,
            min_group_gap: tier.min_group_gap,
            sibling_gap: tier.sibling_gap,
        })
    }

    /// Offsets tried by the collision search, most negative first.
    pub fn search_offsets(&self) -> impl Iterator<Item = f64> + use<> {
        let steps = (self.search_radius / self.search_step).min(MAX_SEARCH_STEPS) as i64;
        let step = self.search_step;
        (-steps..=steps).map(move |i| i as f64 * step)
    }
}
