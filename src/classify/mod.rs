//! Cell-pair verification and inlier marking.
//!
//! For every left cell the best supported right cell is scored by summing
//! the bins of the nine neighbor pairs. The pair is accepted when the score
//! reaches `threshold_factor * sqrt(n / p)`, where `n` counts the points in
//! the participating left neighbors and `p` the participating pairs.

use crate::grid::NeighborTable;
use crate::stats::{CellPair, MotionStatistics};

/// Score and threshold of a verified cell pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellVerdict {
    /// Right cell paired with the left cell.
    pub right: usize,
    /// Summed support over the neighbor pairs.
    pub score: u32,
    /// Acceptance threshold for this pair.
    pub threshold: f64,
}

impl CellVerdict {
    /// Returns true if the pair passes verification.
    pub fn accepted(&self) -> bool {
        self.score as f64 >= self.threshold
    }
}

/// Scores the best cell pair of every left cell.
///
/// `pattern` maps each left NB9 position to the right NB9 position it is
/// paired with under the active rotation.
pub fn verify_cell_pairs(
    stats: &MotionStatistics,
    left_nb: &NeighborTable,
    right_nb: &NeighborTable,
    pattern: &[usize; 9],
    threshold_factor: f64,
) -> Vec<Option<CellVerdict>> {
    debug_assert_eq!(left_nb.dims(), stats.left_dims());
    debug_assert_eq!(right_nb.dims(), stats.right_dims());

    let mut out = Vec::with_capacity(stats.left_dims().len());
    for left in 0..stats.left_dims().len() {
        let Some(right) = stats.best_right(left) else {
            out.push(None);
            continue;
        };

        let nb_left = left_nb.get(left);
        let nb_right = right_nb.get(right);
        let mut score = 0u32;
        let mut points = 0u32;
        let mut pairs = 0u32;
        for (pos, ll) in nb_left.iter().enumerate() {
            let (Some(ll), Some(rr)) = (*ll, nb_right[pattern[pos]]) else {
                continue;
            };
            score += stats.count(ll, rr);
            points += stats.left_points(ll);
            pairs += 1;
        }

        // The center pair always participates, so `pairs` is at least one.
        let threshold = threshold_factor * (points as f64 / pairs as f64).sqrt();
        out.push(Some(CellVerdict {
            right,
            score,
            threshold,
        }));
    }
    out
}

/// Sets `mask[i]` for every match whose cell pair was accepted.
///
/// Existing `true` entries are kept so masks from several grid shifts combine
/// by union. Returns the number of newly marked matches.
pub fn mark_inliers(
    pairs: &[CellPair],
    verdicts: &[Option<CellVerdict>],
    mask: &mut [bool],
) -> usize {
    debug_assert_eq!(pairs.len(), mask.len());
    let mut marked = 0usize;
    for (pair, slot) in pairs.iter().zip(mask.iter_mut()) {
        let Some(left) = pair.left else {
            continue;
        };
        let Some(verdict) = verdicts[left] else {
            continue;
        };
        if verdict.right == pair.right && verdict.accepted() && !*slot {
            *slot = true;
            marked += 1;
        }
    }
    marked
}
