//! Rotation and scale hypotheses for transform-aware filtering.
//!
//! The search space is a fixed, finite list enumerated in a stable order:
//! scale ratios outermost, then rotation steps. Selection keeps the first
//! hypothesis with the largest inlier count, so identical inputs always pick
//! the same hypothesis.

mod rotation;

pub use rotation::{neighbor_pattern, ROTATION_STEPS, ROTATION_STEP_DEG};

use crate::grid::{GridDims, GRID_DIM};
use crate::util::math::{round_cells, wrap_deg};

/// Candidate ratios between right and left grid resolution, in search order.
pub const SCALE_RATIOS: [f64; 5] = [
    1.0,
    0.5,
    std::f64::consts::FRAC_1_SQRT_2,
    std::f64::consts::SQRT_2,
    2.0,
];

/// One combined rotation/scale candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hypothesis {
    /// Rotation in 45 degree steps, `0..ROTATION_STEPS`.
    pub rotation_idx: usize,
    /// Index into [`SCALE_RATIOS`].
    pub scale_idx: usize,
}

impl Hypothesis {
    /// No rotation, unit scale.
    pub const IDENTITY: Hypothesis = Hypothesis {
        rotation_idx: 0,
        scale_idx: 0,
    };

    /// Rotation of the hypothesis in degrees, wrapped to [-180, 180).
    pub fn rotation_deg(&self) -> f32 {
        wrap_deg(self.rotation_idx as f32 * ROTATION_STEP_DEG)
    }

    /// Scale ratio of the hypothesis.
    pub fn scale_ratio(&self) -> f64 {
        SCALE_RATIOS[self.scale_idx]
    }

    /// Right grid dimensions implied by the scale ratio.
    pub fn right_dims(&self) -> GridDims {
        GridDims::square(round_cells(GRID_DIM as f64 * self.scale_ratio()))
    }

    pub(crate) fn pattern(&self) -> [usize; 9] {
        neighbor_pattern(self.rotation_idx)
    }
}

impl Default for Hypothesis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Ordered list of hypotheses to evaluate.
#[derive(Clone, Debug)]
pub struct HypothesisSet {
    items: Vec<Hypothesis>,
}

impl HypothesisSet {
    /// Builds the search space for the given extension flags.
    pub fn new(with_rotation: bool, with_scale: bool) -> Self {
        let rotations = if with_rotation { ROTATION_STEPS } else { 1 };
        let scales = if with_scale { SCALE_RATIOS.len() } else { 1 };
        let mut items = Vec::with_capacity(rotations * scales);
        for scale_idx in 0..scales {
            for rotation_idx in 0..rotations {
                items.push(Hypothesis {
                    rotation_idx,
                    scale_idx,
                });
            }
        }
        Self { items }
    }

    /// Returns the number of hypotheses.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the hypotheses in search order.
    pub fn as_slice(&self) -> &[Hypothesis] {
        &self.items
    }

    /// Iterates hypotheses in search order.
    pub fn iter(&self) -> impl Iterator<Item = &Hypothesis> + '_ {
        self.items.iter()
    }

    /// Returns the distinct scale indices referenced by the set, ascending.
    pub fn scale_indices(&self) -> Vec<usize> {
        let mut out: Vec<usize> = self.items.iter().map(|h| h.scale_idx).collect();
        out.dedup();
        out
    }

    /// Returns the hypothesis whose rotation is circularly nearest `angle_deg`
    /// at unit scale, if the set contains rotations at unit scale.
    pub fn nearest_rotation(&self, angle_deg: f32) -> Option<Hypothesis> {
        let mut best: Option<(Hypothesis, f32)> = None;
        for h in self.items.iter().filter(|h| h.scale_idx == 0) {
            let dist = wrap_deg(angle_deg - h.rotation_deg()).abs();
            match best {
                Some((_, best_dist)) if best_dist <= dist => {}
                _ => best = Some((*h, dist)),
            }
        }
        best.map(|(h, _)| h)
    }
}
