//! Low-level building blocks for custom filtering pipelines.
//!
//! These expose the grid partitioner, bin tables and cell-pair verification
//! used by [`GmsMatcher`](crate::GmsMatcher). Most users should call
//! [`match_gms`](crate::match_gms) instead.

pub use crate::classify::{mark_inliers, verify_cell_pairs, CellVerdict};
pub use crate::grid::{GridDims, GridPartitioner, GridShift, NeighborTable, GRID_DIM, NB9};
pub use crate::stats::{CellPair, MotionStatistics};
pub use crate::transform::{neighbor_pattern, ROTATION_STEPS, ROTATION_STEP_DEG, SCALE_RATIOS};
