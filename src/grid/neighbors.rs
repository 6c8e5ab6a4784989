//! 3x3 neighborhood lookup tables for cell grids.

use crate::grid::GridDims;

/// Neighbor cells of a cell in row-major order (top-left first, center at 4).
pub type NB9 = [Option<usize>; 9];

/// Precomputed NB9 neighborhoods for every cell of a grid.
#[derive(Clone, Debug)]
pub struct NeighborTable {
    dims: GridDims,
    cells: Vec<NB9>,
}

impl NeighborTable {
    /// Builds the table for `dims`.
    pub fn new(dims: GridDims) -> Self {
        let cells = (0..dims.len()).map(|idx| nb9(dims, idx)).collect();
        Self { dims, cells }
    }

    /// Returns the grid dimensions this table was built for.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Returns the neighborhood of `cell`.
    pub fn get(&self, cell: usize) -> &NB9 {
        &self.cells[cell]
    }
}

fn nb9(dims: GridDims, idx: usize) -> NB9 {
    let mut out = [None; 9];
    let (col, row) = dims.col_row(idx);
    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            let c = col as isize + dx;
            let r = row as isize + dy;
            if c < 0 || r < 0 || c >= dims.cols as isize || r >= dims.rows as isize {
                continue;
            }
            let pos = ((dx + 1) + (dy + 1) * 3) as usize;
            out[pos] = Some(dims.index(c as usize, r as usize));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_cell_has_full_neighborhood() {
        let table = NeighborTable::new(GridDims::square(20));
        let nb = table.get(21);
        assert_eq!(
            *nb,
            [
                Some(0),
                Some(1),
                Some(2),
                Some(20),
                Some(21),
                Some(22),
                Some(40),
                Some(41),
                Some(42)
            ]
        );
    }

    #[test]
    fn corner_cell_masks_outside_neighbors() {
        let table = NeighborTable::new(GridDims::square(20));
        let nb = table.get(0);
        assert_eq!(nb.iter().filter(|c| c.is_some()).count(), 4);
        assert_eq!(nb[4], Some(0));
        assert_eq!(nb[5], Some(1));
        assert_eq!(nb[7], Some(20));
        assert_eq!(nb[8], Some(21));
    }
}
