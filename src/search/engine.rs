//! Sequential evaluation of GMS hypotheses.
//!
//! Cell assignments only depend on the grid shift (left) and the scale ratio
//! (right), so they are computed once per call and shared by every rotation.

use crate::classify::{mark_inliers, verify_cell_pairs};
use crate::feature::{DMatch, ImageSize, Keypoint};
use crate::grid::{GridDims, GridPartitioner, GridShift, NeighborTable};
use crate::stats::{CellPair, MotionStatistics};
use crate::trace::trace_debug;
use crate::transform::{Hypothesis, HypothesisSet};

/// Cell pairs of every match for one right-grid resolution.
pub(crate) struct ScaleLevel {
    pub(crate) scale_idx: usize,
    pub(crate) right_nb: NeighborTable,
    /// One entry per [`GridShift`], in `GridShift::ALL` order.
    pub(crate) pairs: Vec<Vec<CellPair>>,
}

/// Validated image sizes and keypoints of one filtering call.
#[derive(Clone, Copy)]
pub(crate) struct MatchInputs<'a> {
    pub(crate) size1: ImageSize,
    pub(crate) size2: ImageSize,
    pub(crate) keypoints1: &'a [Keypoint],
    pub(crate) keypoints2: &'a [Keypoint],
}

/// Per-call cell assignments shared by all hypotheses.
pub(crate) struct PreparedMatches {
    pub(crate) left_nb: NeighborTable,
    pub(crate) levels: Vec<ScaleLevel>,
    pub(crate) num_matches: usize,
}

impl PreparedMatches {
    /// Resolves every match to cells under each grid shift and scale.
    ///
    /// Inputs must already be validated.
    pub(crate) fn new(inputs: MatchInputs<'_>, matches: &[DMatch], scale_indices: &[usize]) -> Self {
        let MatchInputs {
            size1,
            size2,
            keypoints1,
            keypoints2,
        } = inputs;
        let left_dims = GridDims::default();
        let left_grid = GridPartitioner::new(size1, left_dims);
        let left_cells: Vec<Vec<Option<usize>>> = GridShift::ALL
            .iter()
            .map(|&shift| {
                matches
                    .iter()
                    .map(|m| {
                        let kp = &keypoints1[m.query_idx];
                        left_grid.shifted_cell_of(kp.x, kp.y, shift)
                    })
                    .collect()
            })
            .collect();

        let levels = scale_indices
            .iter()
            .map(|&scale_idx| {
                let right_dims = Hypothesis {
                    rotation_idx: 0,
                    scale_idx,
                }
                .right_dims();
                let right_grid = GridPartitioner::new(size2, right_dims);
                let right_cells: Vec<usize> = matches
                    .iter()
                    .map(|m| {
                        let kp = &keypoints2[m.train_idx];
                        right_grid.cell_of(kp.x, kp.y)
                    })
                    .collect();
                let pairs = left_cells
                    .iter()
                    .map(|lefts| {
                        lefts
                            .iter()
                            .zip(right_cells.iter())
                            .map(|(&left, &right)| CellPair { left, right })
                            .collect()
                    })
                    .collect();
                ScaleLevel {
                    scale_idx,
                    right_nb: NeighborTable::new(right_dims),
                    pairs,
                }
            })
            .collect();

        Self {
            left_nb: NeighborTable::new(left_dims),
            levels,
            num_matches: matches.len(),
        }
    }

    pub(crate) fn level(&self, scale_idx: usize) -> Option<&ScaleLevel> {
        self.levels.iter().find(|level| level.scale_idx == scale_idx)
    }
}

/// Inlier mask produced by one hypothesis.
#[derive(Clone, Debug)]
pub(crate) struct HypothesisOutcome {
    pub(crate) hypothesis: Hypothesis,
    pub(crate) mask: Vec<bool>,
    pub(crate) num_inliers: usize,
}

/// Collects statistics for one grid shift.
pub(crate) type Collector = fn(GridDims, GridDims, &[CellPair]) -> MotionStatistics;

/// Runs every grid shift for one hypothesis and unions the inlier masks.
pub(crate) fn run_hypothesis(
    prepared: &PreparedMatches,
    hypothesis: Hypothesis,
    threshold_factor: f64,
    collect: Collector,
) -> HypothesisOutcome {
    let mut mask = vec![false; prepared.num_matches];
    let Some(level) = prepared.level(hypothesis.scale_idx) else {
        return HypothesisOutcome {
            hypothesis,
            mask,
            num_inliers: 0,
        };
    };

    let pattern = hypothesis.pattern();
    let left_dims = prepared.left_nb.dims();
    let right_dims = level.right_nb.dims();
    let mut num_inliers = 0usize;
    for pairs in &level.pairs {
        let stats = collect(left_dims, right_dims, pairs);
        let verdicts = verify_cell_pairs(
            &stats,
            &prepared.left_nb,
            &level.right_nb,
            &pattern,
            threshold_factor,
        );
        num_inliers += mark_inliers(pairs, &verdicts, &mut mask);
    }

    trace_debug!(
        "gms_hypothesis",
        rotation_deg = hypothesis.rotation_deg(),
        scale = hypothesis.scale_ratio(),
        inliers = num_inliers
    );

    HypothesisOutcome {
        hypothesis,
        mask,
        num_inliers,
    }
}

/// Evaluates hypotheses one after another in search order.
pub(crate) fn evaluate(
    prepared: &PreparedMatches,
    hypotheses: &HypothesisSet,
    threshold_factor: f64,
) -> Vec<HypothesisOutcome> {
    hypotheses
        .iter()
        .map(|&h| run_hypothesis(prepared, h, threshold_factor, MotionStatistics::collect))
        .collect()
}

/// Returns the first outcome with the most inliers.
pub(crate) fn select_best(outcomes: Vec<HypothesisOutcome>) -> Option<HypothesisOutcome> {
    let mut best: Option<HypothesisOutcome> = None;
    for outcome in outcomes {
        match &best {
            Some(current) if current.num_inliers >= outcome.num_inliers => {}
            _ => best = Some(outcome),
        }
    }
    best
}

/// Re-runs the selected hypothesis on its own kept matches until none drop.
///
/// Each pass bins only the matches kept so far. The kept set shrinks
/// strictly until a pass keeps all of it, which is the returned mask.
pub(crate) fn refine_to_fixed_point(
    inputs: MatchInputs<'_>,
    matches: &[DMatch],
    mut best: HypothesisOutcome,
    threshold_factor: f64,
    collect: Collector,
) -> HypothesisOutcome {
    let mut pass = 0usize;
    loop {
        let kept: Vec<usize> = best
            .mask
            .iter()
            .enumerate()
            .filter(|(_, &keep)| keep)
            .map(|(idx, _)| idx)
            .collect();
        if kept.is_empty() {
            return best;
        }
        let subset: Vec<DMatch> = kept.iter().map(|&idx| matches[idx]).collect();
        let prepared = PreparedMatches::new(inputs, &subset, &[best.hypothesis.scale_idx]);
        let rerun = run_hypothesis(&prepared, best.hypothesis, threshold_factor, collect);
        pass += 1;
        trace_debug!(
            "gms_refine",
            pass = pass,
            kept = kept.len(),
            survivors = rerun.num_inliers
        );
        if rerun.num_inliers == kept.len() {
            return best;
        }
        for (&idx, &keep) in kept.iter().zip(rerun.mask.iter()) {
            if !keep {
                best.mask[idx] = false;
            }
        }
        best.num_inliers = rerun.num_inliers;
    }
}
