//! Vertical placement of sibling groups inside one layer.
//!
//! Groups arrive already ordered. Each group is a run of `k` evenly spaced
//! y values. A group with a target is centered on it and, if that collides
//! with nodes already placed in the layer, nudged by the first offset of the
//! search window that clears every collision (or else the offset with the
//! fewest). A group without a target is stacked under the lowest placed node.

use super::config::Spacing;

/// Places groups one after another, remembering every y already used.
#[derive(Debug, Clone)]
pub struct LayerPlacer {
    spacing: Spacing,
    offsets: Vec<f64>,
    used: Vec<f64>,
}

impl LayerPlacer {
    /// `offsets` is the collision search window in scan order.
    pub fn new(spacing: Spacing, offsets: impl IntoIterator<Item = f64>) -> Self {
        Self {
            spacing,
            offsets: offsets.into_iter().collect(),
            used: Vec::new(),
        }
    }

    /// Place a group of `count` siblings and return their y values, top to bottom.
    pub fn place(&mut self, count: usize, target: Option<f64>) -> Vec<f64> {
        let span = count.saturating_sub(1) as f64 * self.spacing.sibling_gap;

        let start = match target {
            Some(target) => {
                let start = target - span / 2.0;
                if self.conflicts(start, count) == 0 {
                    start
                } else {
                    self.search(start, count)
                }
            }
            None => match self.lowest() {
                Some(max_y) => max_y + self.spacing.min_group_gap - span / 2.0,
                None => 0.0,
            },
        };

        let ys: Vec<f64> = self.run(start, count).collect();
        self.used.extend_from_slice(&ys);
        ys
    }

    /// Every y handed out so far.
    pub fn used(&self) -> &[f64] {
        &self.used
    }

    fn run(&self, start: f64, count: usize) -> impl Iterator<Item = f64> + use<> {
        let gap = self.spacing.sibling_gap;
        (0..count).map(move |i| start + i as f64 * gap)
    }

    /// Number of candidate y values closer than `min_group_gap` to a used y.
    fn conflicts(&self, start: f64, count: usize) -> usize {
        let min_gap = self.spacing.min_group_gap;
        self.run(start, count)
            .filter(|y| self.used.iter().any(|u| (y - u).abs() < min_gap))
            .count()
    }

    fn search(&self, start: f64, count: usize) -> f64 {
        let mut best_start = start;
        let mut best = usize::MAX;
        for &offset in &self.offsets {
            let candidate = start + offset;
            let found = self.conflicts(candidate, count);
            if found < best {
                best = found;
                best_start = candidate;
                if best == 0 {
                    break;
                }
            }
        }
        best_start
    }

    fn lowest(&self) -> Option<f64> {
        self.used.iter().copied().reduce(f64::max)
    }
}

/// Shift that centers `ys` on zero: `-(max + min) / 2`. Zero for no values.
pub fn recenter_shift(ys: &[f64]) -> f64 {
    let Some(&first) = ys.first() else { return 0.0 };
    let (lo, hi) = ys.iter().fold((first, first), |(lo, hi), &y| (lo.min(y), hi.max(y)));
    -(hi + lo) / 2.0
}
