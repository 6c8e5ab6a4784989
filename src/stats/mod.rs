//! Motion statistics over cell pairs.
//!
//! Each match contributes one count to the bin of its (left cell, right cell)
//! pair and one point to its left cell. Bins live in a dense table sized by
//! the left and right grids of the active hypothesis.

use crate::grid::GridDims;

/// Left and right cells of one match, `None` when the left point falls
/// outside a shifted grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPair {
    pub left: Option<usize>,
    pub right: usize,
}

/// Dense cell-pair bin counts for one hypothesis and grid shift.
#[derive(Clone, Debug)]
pub struct MotionStatistics {
    left: GridDims,
    right: GridDims,
    counts: Vec<u32>,
    left_points: Vec<u32>,
}

impl MotionStatistics {
    /// Creates an empty table for the given grids.
    pub fn new(left: GridDims, right: GridDims) -> Self {
        Self {
            left,
            right,
            counts: vec![0; left.len() * right.len()],
            left_points: vec![0; left.len()],
        }
    }

    /// Builds statistics from cell pairs in input order.
    pub fn collect(left: GridDims, right: GridDims, pairs: &[CellPair]) -> Self {
        let mut stats = Self::new(left, right);
        stats.accumulate(pairs);
        stats
    }

    /// Adds every binned pair to the table.
    pub fn accumulate(&mut self, pairs: &[CellPair]) {
        for pair in pairs {
            if let Some(left) = pair.left {
                self.add(left, pair.right);
            }
        }
    }

    /// Counts one match in the `(left, right)` bin.
    pub fn add(&mut self, left: usize, right: usize) {
        let idx = self.bin(left, right);
        self.counts[idx] += 1;
        self.left_points[left] += 1;
    }

    /// Merges counts from another table with the same grids.
    pub fn merge(&mut self, other: &MotionStatistics) {
        debug_assert_eq!(self.left, other.left);
        debug_assert_eq!(self.right, other.right);
        for (dst, src) in self.counts.iter_mut().zip(other.counts.iter()) {
            *dst += *src;
        }
        for (dst, src) in self.left_points.iter_mut().zip(other.left_points.iter()) {
            *dst += *src;
        }
    }

    /// Returns the left grid dimensions.
    pub fn left_dims(&self) -> GridDims {
        self.left
    }

    /// Returns the right grid dimensions.
    pub fn right_dims(&self) -> GridDims {
        self.right
    }

    /// Returns the support count of a cell pair.
    pub fn count(&self, left: usize, right: usize) -> u32 {
        self.counts[self.bin(left, right)]
    }

    /// Returns the number of matches whose left point lies in `left`.
    pub fn left_points(&self, left: usize) -> u32 {
        self.left_points[left]
    }

    /// Returns the bin counts of every right cell for one left cell.
    pub fn row(&self, left: usize) -> &[u32] {
        let start = left * self.right.len();
        &self.counts[start..start + self.right.len()]
    }

    /// Returns the right cell with the most support for `left`.
    ///
    /// The first maximum in index order wins; empty rows return `None`.
    pub fn best_right(&self, left: usize) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (right, &count) in self.row(left).iter().enumerate() {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((right, count)),
            }
        }
        best.map(|(right, _)| right)
    }

    fn bin(&self, left: usize, right: usize) -> usize {
        debug_assert!(left < self.left.len() && right < self.right.len());
        left * self.right.len() + right
    }
}
