//! Grid partitioning of image extents into coarse cells.
//!
//! Keypoints are normalized by the image size and bucketed with floor
//! semantics, so a point on a cell boundary falls into the cell whose lower
//! edge it touches. The left image is also bucketed under three half-cell
//! shifted grids; a shifted index that reaches the grid size lies outside the
//! grid and is not binned.

mod neighbors;

pub use neighbors::{NeighborTable, NB9};

use crate::feature::ImageSize;
use crate::util::math::floor_index;

/// Number of cells per axis of the left grid.
pub const GRID_DIM: usize = 20;

/// Column and row counts of a cell grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    pub cols: usize,
    pub rows: usize,
}

impl GridDims {
    /// Creates an `n x n` grid.
    pub fn square(n: usize) -> Self {
        Self { cols: n, rows: n }
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    /// Returns true if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens `(col, row)` into a cell index.
    pub fn index(&self, col: usize, row: usize) -> usize {
        debug_assert!(col < self.cols && row < self.rows);
        col + row * self.cols
    }

    /// Splits a cell index into `(col, row)`.
    pub fn col_row(&self, idx: usize) -> (usize, usize) {
        (idx % self.cols, idx / self.cols)
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self::square(GRID_DIM)
    }
}

/// Half-cell offset applied to the left grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridShift {
    None,
    X,
    Y,
    XY,
}

impl GridShift {
    /// All shifts in evaluation order.
    pub const ALL: [GridShift; 4] = [GridShift::None, GridShift::X, GridShift::Y, GridShift::XY];

    fn offsets(self) -> (f64, f64) {
        match self {
            GridShift::None => (0.0, 0.0),
            GridShift::X => (0.5, 0.0),
            GridShift::Y => (0.0, 0.5),
            GridShift::XY => (0.5, 0.5),
        }
    }
}

/// Maps pixel coordinates of one image to cells of a grid.
#[derive(Clone, Copy, Debug)]
pub struct GridPartitioner {
    size: ImageSize,
    dims: GridDims,
}

impl GridPartitioner {
    /// Creates a partitioner for an image of `size` split into `dims` cells.
    pub fn new(size: ImageSize, dims: GridDims) -> Self {
        Self { size, dims }
    }

    /// Returns the grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Returns the cell containing `(x, y)` on the unshifted grid.
    ///
    /// Coordinates are clamped into the grid, so points on the right or
    /// bottom image edge map to the last column or row.
    pub fn cell_of(&self, x: f32, y: f32) -> usize {
        let col = floor_index(self.scaled_x(x))
            .unwrap_or(0)
            .min(self.dims.cols - 1);
        let row = floor_index(self.scaled_y(y))
            .unwrap_or(0)
            .min(self.dims.rows - 1);
        self.dims.index(col, row)
    }

    /// Returns the cell containing `(x, y)` on a shifted grid.
    ///
    /// `GridShift::None` behaves like [`cell_of`](Self::cell_of). For other
    /// shifts, points pushed past the last cell return `None`.
    pub fn shifted_cell_of(&self, x: f32, y: f32, shift: GridShift) -> Option<usize> {
        if shift == GridShift::None {
            return Some(self.cell_of(x, y));
        }
        let (ox, oy) = shift.offsets();
        let col = floor_index(self.scaled_x(x) + ox)?;
        let row = floor_index(self.scaled_y(y) + oy)?;
        if col >= self.dims.cols || row >= self.dims.rows {
            return None;
        }
        Some(self.dims.index(col, row))
    }

    fn scaled_x(&self, x: f32) -> f64 {
        (x as f64) * (self.dims.cols as f64) / (self.size.width as f64)
    }

    fn scaled_y(&self, y: f32) -> f64 {
        (y as f64) * (self.dims.rows as f64) / (self.size.height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vga() -> GridPartitioner {
        GridPartitioner::new(ImageSize::new(640, 480).unwrap(), GridDims::default())
    }

    #[test]
    fn cell_of_uses_floor_on_boundaries() {
        let grid = vga();
        // Cells are 32x24 pixels.
        assert_eq!(grid.cell_of(0.0, 0.0), 0);
        assert_eq!(grid.cell_of(31.99, 0.0), 0);
        assert_eq!(grid.cell_of(32.0, 0.0), 1);
        assert_eq!(grid.cell_of(0.0, 24.0), 20);
        assert_eq!(grid.cell_of(33.0, 25.0), 21);
    }

    #[test]
    fn cell_of_clamps_far_edges() {
        let grid = vga();
        assert_eq!(grid.cell_of(640.0, 480.0), 399);
        assert_eq!(grid.cell_of(640.0, 0.0), 19);
    }

    #[test]
    fn shifted_grid_moves_boundaries_by_half_a_cell() {
        let grid = vga();
        assert_eq!(grid.shifted_cell_of(15.0, 0.0, GridShift::X), Some(0));
        assert_eq!(grid.shifted_cell_of(16.0, 0.0, GridShift::X), Some(1));
        assert_eq!(grid.shifted_cell_of(16.0, 12.0, GridShift::XY), Some(21));
        assert_eq!(grid.shifted_cell_of(16.0, 12.0, GridShift::Y), Some(20));
    }

    #[test]
    fn shifted_grid_drops_points_past_last_cell() {
        let grid = vga();
        assert_eq!(grid.shifted_cell_of(630.0, 10.0, GridShift::X), None);
        assert_eq!(grid.shifted_cell_of(630.0, 10.0, GridShift::Y), Some(19));
        assert_eq!(grid.shifted_cell_of(10.0, 470.0, GridShift::XY), None);
    }

    #[test]
    fn shifted_grid_keeps_half_width_first_cell() {
        let grid = vga();
        assert_eq!(grid.shifted_cell_of(5.0, 100.0, GridShift::X), Some(4 * 20));
        assert_eq!(grid.shifted_cell_of(100.0, 5.0, GridShift::Y), Some(3));
        assert_eq!(grid.shifted_cell_of(0.0, 0.0, GridShift::XY), Some(0));
    }

    #[test]
    fn col_row_inverts_index() {
        let dims = GridDims { cols: 14, rows: 10 };
        for idx in 0..dims.len() {
            let (c, r) = dims.col_row(idx);
            assert_eq!(dims.index(c, r), idx);
        }
    }
}
