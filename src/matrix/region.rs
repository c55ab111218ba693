//! Disjoint mutable views into a `MatrixBlock`
//!
//! A `BlockRegion` covers a contiguous range of rows (dense or sparse) or
//! columns (dense only). Regions handed to different tasks never overlap,
//! which the borrow checker enforces through `split_at`/`split_at_mut`.

use ndarray::ArrayViewMut2;

use crate::matrix::block::SparseRow;

/// Cell storage behind a region
pub(crate) enum RegionCells<'a> {
    Dense(ArrayViewMut2<'a, f64>),
    Sparse {
        rows: &'a mut [SparseRow],
        n_cols: usize,
        capacity_hint: usize,
    },
}

/// Mutable view of a rectangular part of a `MatrixBlock`
///
/// All coordinates passed to a region are global matrix coordinates.
pub struct BlockRegion<'a> {
    row_offset: usize,
    col_offset: usize,
    cells: RegionCells<'a>,
}

impl<'a> BlockRegion<'a> {
    pub(crate) fn new(row_offset: usize, col_offset: usize, cells: RegionCells<'a>) -> Self {
        Self {
            row_offset,
            col_offset,
            cells,
        }
    }

    /// First global row covered by this region
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// First global column covered by this region
    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Number of rows covered
    pub fn n_rows(&self) -> usize {
        match &self.cells {
            RegionCells::Dense(view) => view.nrows(),
            RegionCells::Sparse { rows, .. } => rows.len(),
        }
    }

    /// Number of columns covered
    pub fn n_cols(&self) -> usize {
        match &self.cells {
            RegionCells::Dense(view) => view.ncols(),
            RegionCells::Sparse { n_cols, .. } => *n_cols,
        }
    }

    /// True if the underlying storage is sparse
    pub fn is_sparse(&self) -> bool {
        matches!(self.cells, RegionCells::Sparse { .. })
    }

    /// True if global cell (row, col) lies inside this region
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row_offset
            && row < self.row_offset + self.n_rows()
            && col >= self.col_offset
            && col < self.col_offset + self.n_cols()
    }

    /// Writes a value at global (row, col)
    ///
    /// Sparse regions append: within a row, columns must be written in
    /// increasing order and each cell at most once.
    #[inline]
    pub fn put(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(
            self.contains(row, col),
            "cell ({}, {}) outside region",
            row,
            col
        );
        let r = row - self.row_offset;
        let c = col - self.col_offset;
        match &mut self.cells {
            RegionCells::Dense(view) => view[[r, c]] = value,
            RegionCells::Sparse {
                rows,
                capacity_hint,
                ..
            } => rows[r].append(c, value, *capacity_hint),
        }
    }
}
