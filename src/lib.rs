//! GmsMatch filters feature matches with Grid-based Motion Statistics.
//!
//! Matches produced by a nearest-neighbor matcher are bucketed into coarse
//! cell pairs; a match survives when the neighborhood of its cell pair holds
//! enough consistent support. Optional rotation and scale searches cover
//! image pairs related by large transforms, and the `rayon` feature evaluates
//! those hypotheses in parallel.

pub mod classify;
pub mod feature;
pub mod grid;
#[cfg(feature = "image-io")]
pub mod io;
pub mod lowlevel;
pub mod search;
pub mod stats;
mod trace;
pub mod transform;
pub mod util;

pub use feature::{DMatch, ImageSize, Keypoint};
pub use search::{match_gms, GmsConfig, GmsMatcher, GmsReport, DEFAULT_THRESHOLD_FACTOR};
pub use transform::{Hypothesis, HypothesisSet};
pub use util::{GmsError, GmsResult};
