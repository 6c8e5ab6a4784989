//! High-level GMS filtering API.
//!
//! [`match_gms`] is the one-call entry point. [`GmsMatcher`] keeps a
//! configuration around and returns a [`GmsReport`] with the inlier mask and
//! the winning rotation/scale hypothesis.
//!
//! The winning hypothesis is re-run on its own kept matches until every kept
//! match survives, so filtering an already filtered set returns it unchanged.

pub(crate) mod engine;
#[cfg(feature = "rayon")]
pub(crate) mod parallel;

use crate::feature::{validate_keypoints, validate_matches, DMatch, ImageSize, Keypoint};
use crate::stats::MotionStatistics;
use crate::trace::{trace_event, trace_span};
use crate::transform::{Hypothesis, HypothesisSet};
use crate::util::{GmsError, GmsResult};
use engine::{
    refine_to_fixed_point, select_best, Collector, HypothesisOutcome, MatchInputs, PreparedMatches,
};

/// Default value of [`GmsConfig::threshold_factor`].
pub const DEFAULT_THRESHOLD_FACTOR: f64 = 6.0;

/// Parameters of the GMS filter.
#[derive(Clone, Debug, PartialEq)]
pub struct GmsConfig {
    /// Search over 45 degree rotation hypotheses.
    pub with_rotation: bool,
    /// Search over scale ratio hypotheses.
    pub with_scale: bool,
    /// Multiplier of the acceptance threshold; higher keeps fewer matches.
    pub threshold_factor: f64,
    /// Evaluate hypotheses on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for GmsConfig {
    fn default() -> Self {
        Self {
            with_rotation: false,
            with_scale: false,
            threshold_factor: DEFAULT_THRESHOLD_FACTOR,
            parallel: false,
        }
    }
}

impl GmsConfig {
    /// Checks that the threshold factor is finite and non-negative.
    pub fn validate(&self) -> GmsResult<()> {
        if !self.threshold_factor.is_finite() || self.threshold_factor < 0.0 {
            return Err(GmsError::InvalidThresholdFactor {
                value: self.threshold_factor,
            });
        }
        Ok(())
    }

    /// Returns the hypotheses searched under this configuration.
    pub fn hypotheses(&self) -> HypothesisSet {
        HypothesisSet::new(self.with_rotation, self.with_scale)
    }
}

/// Result of one filtering call.
#[derive(Clone, Debug, PartialEq)]
pub struct GmsReport {
    /// `true` for every input match kept by the filter.
    pub inlier_mask: Vec<bool>,
    /// Number of `true` entries in `inlier_mask`.
    pub num_inliers: usize,
    /// Hypothesis that produced the mask.
    pub hypothesis: Hypothesis,
    /// Single-pass inlier count of every searched hypothesis, in search order.
    pub hypothesis_inliers: Vec<(Hypothesis, usize)>,
    /// Kept matches in input order.
    pub matches: Vec<DMatch>,
}

/// Reusable GMS filter.
#[derive(Clone, Debug, Default)]
pub struct GmsMatcher {
    cfg: GmsConfig,
}

impl GmsMatcher {
    /// Creates a matcher with the given configuration.
    pub fn new(cfg: GmsConfig) -> Self {
        Self { cfg }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: GmsConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &GmsConfig {
        &self.cfg
    }

    /// Filters `matches` and returns the kept matches with diagnostics.
    pub fn filter(
        &self,
        size1: ImageSize,
        size2: ImageSize,
        keypoints1: &[Keypoint],
        keypoints2: &[Keypoint],
        matches: &[DMatch],
    ) -> GmsResult<GmsReport> {
        self.cfg.validate()?;
        size1.validate()?;
        size2.validate()?;
        validate_keypoints(keypoints1, size1, "keypoints1")?;
        validate_keypoints(keypoints2, size2, "keypoints2")?;
        validate_matches(matches, keypoints1.len(), keypoints2.len())?;

        let hypotheses = self.cfg.hypotheses();
        let _span = trace_span!(
            "gms_filter",
            matches = matches.len(),
            hypotheses = hypotheses.len()
        )
        .entered();

        if matches.is_empty() {
            return Ok(GmsReport {
                inlier_mask: Vec::new(),
                num_inliers: 0,
                hypothesis: Hypothesis::IDENTITY,
                hypothesis_inliers: hypotheses.iter().map(|&h| (h, 0)).collect(),
                matches: Vec::new(),
            });
        }

        let inputs = MatchInputs {
            size1,
            size2,
            keypoints1,
            keypoints2,
        };
        let prepared = PreparedMatches::new(inputs, matches, &hypotheses.scale_indices());
        let outcomes = self.evaluate(&prepared, &hypotheses);
        let hypothesis_inliers = outcomes
            .iter()
            .map(|outcome| (outcome.hypothesis, outcome.num_inliers))
            .collect();
        let best = select_best(outcomes).unwrap_or_else(|| HypothesisOutcome {
            hypothesis: Hypothesis::IDENTITY,
            mask: vec![false; matches.len()],
            num_inliers: 0,
        });
        let best = refine_to_fixed_point(
            inputs,
            matches,
            best,
            self.cfg.threshold_factor,
            self.collector(),
        );

        let kept: Vec<DMatch> = matches
            .iter()
            .zip(best.mask.iter())
            .filter(|(_, &keep)| keep)
            .map(|(m, _)| *m)
            .collect();

        trace_event!(
            "gms_result",
            inliers = best.num_inliers,
            rotation_deg = best.hypothesis.rotation_deg(),
            scale = best.hypothesis.scale_ratio()
        );

        Ok(GmsReport {
            inlier_mask: best.mask,
            num_inliers: best.num_inliers,
            hypothesis: best.hypothesis,
            hypothesis_inliers,
            matches: kept,
        })
    }

    /// Returns only the inlier mask for `matches`.
    pub fn inlier_mask(
        &self,
        size1: ImageSize,
        size2: ImageSize,
        keypoints1: &[Keypoint],
        keypoints2: &[Keypoint],
        matches: &[DMatch],
    ) -> GmsResult<Vec<bool>> {
        Ok(self
            .filter(size1, size2, keypoints1, keypoints2, matches)?
            .inlier_mask)
    }

    #[cfg(feature = "rayon")]
    fn evaluate(
        &self,
        prepared: &PreparedMatches,
        hypotheses: &HypothesisSet,
    ) -> Vec<HypothesisOutcome> {
        if self.cfg.parallel {
            return parallel::evaluate_par(prepared, hypotheses, self.cfg.threshold_factor);
        }
        engine::evaluate(prepared, hypotheses, self.cfg.threshold_factor)
    }

    #[cfg(feature = "rayon")]
    fn collector(&self) -> Collector {
        if self.cfg.parallel {
            return parallel::collect_par;
        }
        MotionStatistics::collect
    }

    #[cfg(not(feature = "rayon"))]
    fn collector(&self) -> Collector {
        MotionStatistics::collect
    }

    #[cfg(not(feature = "rayon"))]
    fn evaluate(
        &self,
        prepared: &PreparedMatches,
        hypotheses: &HypothesisSet,
    ) -> Vec<HypothesisOutcome> {
        engine::evaluate(prepared, hypotheses, self.cfg.threshold_factor)
    }
}

/// Filters 1-nearest-neighbor matches with grid-based motion statistics.
///
/// Returns the kept matches in input order. Fails with an invalid-input error
/// when a match references a missing keypoint or a keypoint lies outside its
/// image, and with [`GmsError::InvalidThresholdFactor`] for a negative or
/// non-finite threshold factor.
pub fn match_gms(
    size1: ImageSize,
    size2: ImageSize,
    keypoints1: &[Keypoint],
    keypoints2: &[Keypoint],
    matches1to2: &[DMatch],
    cfg: &GmsConfig,
) -> GmsResult<Vec<DMatch>> {
    let report = GmsMatcher::new(cfg.clone()).filter(
        size1,
        size2,
        keypoints1,
        keypoints2,
        matches1to2,
    )?;
    Ok(report.matches)
}
