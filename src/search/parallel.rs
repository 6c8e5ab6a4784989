//! Rayon-parallel hypothesis evaluation (feature-gated).
//!
//! Hypotheses run concurrently, each owning its bins. When only a single
//! hypothesis is searched, bin collection is split over match chunks and the
//! partial tables are summed instead.

use crate::grid::GridDims;
use crate::search::engine::{run_hypothesis, HypothesisOutcome, PreparedMatches};
use crate::stats::{CellPair, MotionStatistics};
use crate::trace::trace_span;
use crate::transform::HypothesisSet;
use rayon::prelude::*;

/// Matches per chunk when collecting statistics in parallel.
const COLLECT_CHUNK: usize = 4096;

/// Evaluates hypotheses on the rayon pool; output keeps search order.
pub(crate) fn evaluate_par(
    prepared: &PreparedMatches,
    hypotheses: &HypothesisSet,
    threshold_factor: f64,
) -> Vec<HypothesisOutcome> {
    let _span = trace_span!(
        "gms_evaluate",
        hypotheses = hypotheses.len(),
        parallel = true
    )
    .entered();

    if hypotheses.len() == 1 {
        return hypotheses
            .iter()
            .map(|&h| run_hypothesis(prepared, h, threshold_factor, collect_par))
            .collect();
    }

    hypotheses
        .as_slice()
        .par_iter()
        .map(|&h| run_hypothesis(prepared, h, threshold_factor, MotionStatistics::collect))
        .collect()
}

/// Chunk-parallel statistics collection with additive merging.
pub(crate) fn collect_par(left: GridDims, right: GridDims, pairs: &[CellPair]) -> MotionStatistics {
    pairs
        .par_chunks(COLLECT_CHUNK)
        .map(|chunk| MotionStatistics::collect(left, right, chunk))
        .reduce(
            || MotionStatistics::new(left, right),
            |mut acc, part| {
                acc.merge(&part);
                acc
            },
        )
}
