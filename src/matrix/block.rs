//! Output matrix block with dense or sparse-row storage
//!
//! `MatrixBlock` is the physical container generation writes into. Its layout
//! (dense or sparse) is chosen once, before any values are written, and
//! storage is allocated once. Parallel writers never touch the block directly:
//! they receive disjoint [`BlockRegion`] views produced by
//! [`MatrixBlock::split_regions`], so no locking is needed.

use std::fmt;
use std::ops::Range;

use ndarray::{Array2, Axis};
use sprs::CsMat;

use crate::constants::{
    DENSE_CELL_BYTES, SPARSE_ENTRY_BYTES, SPARSE_ROW_OVERHEAD_BYTES, SPARSE_ROW_POINTER_BYTES,
    SPARSITY_TURN_POINT,
};
use crate::error::{DatagenError, Result};
use crate::matrix::region::{BlockRegion, RegionCells};
use crate::utils::exclusive_scan;

/// A single sparse row, stored as parallel column/value arrays
///
/// Rows are allocated on demand: an untouched row holds no heap memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseRow {
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl SparseRow {
    /// Appends an entry; callers append in increasing column order
    #[inline]
    pub fn append(&mut self, col: usize, value: f64, capacity_hint: usize) {
        if self.cols.capacity() == 0 {
            self.cols.reserve(capacity_hint.max(1));
            self.values.reserve(capacity_hint.max(1));
        }
        self.cols.push(col);
        self.values.push(value);
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Iterator over (column, value) entries
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.cols.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at column `col`, or 0 when absent
    pub fn get(&self, col: usize) -> f64 {
        match self.cols.binary_search(&col) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Number of stored entries that are non-zero
    fn count_non_zeros(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }
}

/// Physical storage of a [`MatrixBlock`]
#[derive(Clone, Debug)]
enum Storage {
    /// Nothing allocated yet (or an all-zero block)
    Empty,
    /// Row-major dense array
    Dense(Array2<f64>),
    /// One sparse row per matrix row
    Sparse(Vec<SparseRow>),
}

/// Axis along which a block is split into disjoint regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionAxis {
    Rows,
    Cols,
}

/// Output matrix of generation
#[derive(Clone)]
pub struct MatrixBlock {
    n_rows: usize,
    n_cols: usize,
    sparse: bool,
    nnz: u64,
    estimated_nnz_per_row: usize,
    storage: Storage,
}

impl MatrixBlock {
    /// Creates an empty, unallocated block of the given shape
    pub fn new(n_rows: usize, n_cols: usize, sparse: bool) -> Self {
        Self {
            n_rows,
            n_cols,
            sparse,
            nnz: 0,
            estimated_nnz_per_row: 0,
            storage: Storage::Empty,
        }
    }

    /// Decides whether a matrix with the given shape and non-zero count
    /// should be held in sparse format
    ///
    /// Sparse iff the density is below the sparsity turn point and the
    /// estimated sparse footprint is smaller than the dense one.
    pub fn eval_sparse_format_in_memory(n_rows: usize, n_cols: usize, nnz: u64) -> bool {
        if n_rows == 0 || n_cols == 0 {
            return false;
        }
        let sparsity = nnz as f64 / n_rows as f64 / n_cols as f64;
        let size_sparse = estimate_size_sparse_in_memory(n_rows, n_cols, sparsity);
        let size_dense = estimate_size_dense_in_memory(n_rows, n_cols);
        sparsity < SPARSITY_TURN_POINT && size_sparse < size_dense
    }

    /// Whether concurrent writers may fill disjoint regions split along `axis`
    ///
    /// Needs allocated storage. Dense blocks split along either axis; sparse
    /// rows only split by rows.
    pub fn is_thread_safe(&self, axis: RegionAxis) -> bool {
        match self.storage {
            Storage::Empty => false,
            Storage::Dense(_) => true,
            Storage::Sparse(_) => axis == RegionAxis::Rows,
        }
    }

    /// Drops all content and sets a new shape and layout
    ///
    /// `estimated_nnz` sizes on-demand sparse row allocations.
    pub fn reset(&mut self, n_rows: usize, n_cols: usize, sparse: bool, estimated_nnz: u64) {
        self.n_rows = n_rows;
        self.n_cols = n_cols;
        self.sparse = sparse;
        self.nnz = 0;
        self.estimated_nnz_per_row = if n_rows == 0 {
            0
        } else {
            (estimated_nnz as f64 / n_rows as f64).ceil() as usize
        };
        self.storage = Storage::Empty;
    }

    /// Resets to a dense block with every cell equal to `value`
    pub fn reset_filled(&mut self, n_rows: usize, n_cols: usize, value: f64) {
        self.reset(n_rows, n_cols, false, 0);
        if value == 0.0 {
            return;
        }
        self.storage = Storage::Dense(Array2::from_elem((n_rows, n_cols), value));
        self.nnz = (n_rows as u64) * (n_cols as u64);
    }

    /// Allocates zeroed dense storage
    pub fn allocate_dense_block(&mut self) {
        self.sparse = false;
        self.storage = Storage::Dense(Array2::zeros((self.n_rows, self.n_cols)));
    }

    /// Allocates the sparse row table; rows themselves allocate on demand
    pub fn allocate_sparse_rows_block(&mut self) {
        self.sparse = true;
        self.storage = Storage::Sparse(vec![SparseRow::default(); self.n_rows]);
    }

    /// Recounts non-zero cells and caches the result
    pub fn recompute_non_zeros(&mut self) -> u64 {
        self.nnz = match &self.storage {
            Storage::Empty => 0,
            Storage::Dense(a) => a.iter().filter(|v| **v != 0.0).count() as u64,
            Storage::Sparse(rows) => rows.iter().map(|r| r.count_non_zeros() as u64).sum(),
        };
        self.nnz
    }

    /// Converts between layouts if the current non-zero count calls for it
    pub fn examine_sparsity(&mut self) {
        let target_sparse = Self::eval_sparse_format_in_memory(self.n_rows, self.n_cols, self.nnz);
        if target_sparse == self.sparse {
            return;
        }
        log::debug!(
            "Converting {}x{} block ({} nnz) to {} format",
            self.n_rows,
            self.n_cols,
            self.nnz,
            if target_sparse { "sparse" } else { "dense" }
        );
        let storage = std::mem::replace(&mut self.storage, Storage::Empty);
        self.storage = match storage {
            Storage::Empty => Storage::Empty,
            Storage::Dense(a) => {
                let rows = a
                    .outer_iter()
                    .map(|row| {
                        let mut sparse_row = SparseRow::default();
                        for (j, &v) in row.iter().enumerate() {
                            if v != 0.0 {
                                sparse_row.append(j, v, 0);
                            }
                        }
                        sparse_row
                    })
                    .collect();
                Storage::Sparse(rows)
            }
            Storage::Sparse(rows) => Storage::Dense(sparse_rows_to_dense(&rows, self.n_cols)),
        };
        self.sparse = target_sparse;
    }

    /// Splits the allocated storage into disjoint mutable regions
    ///
    /// `ranges` are cell-index ranges along `axis`; they must be contiguous
    /// and ascending. Column splits are only supported for dense storage.
    pub fn split_regions(
        &mut self,
        axis: RegionAxis,
        ranges: &[Range<usize>],
    ) -> Result<Vec<BlockRegion<'_>>> {
        let extent = match axis {
            RegionAxis::Rows => self.n_rows,
            RegionAxis::Cols => self.n_cols,
        };
        for pair in ranges.windows(2) {
            if pair[0].end != pair[1].start {
                return Err(DatagenError::Dimension(format!(
                    "region ranges {:?} and {:?} are not contiguous",
                    pair[0], pair[1]
                )));
            }
        }
        if let (Some(first), Some(last)) = (ranges.first(), ranges.last()) {
            if first.start > first.end || last.end > extent {
                return Err(DatagenError::Dimension(format!(
                    "region ranges {}..{} exceed extent {}",
                    first.start, last.end, extent
                )));
            }
        }

        let n_rows = self.n_rows;
        let n_cols = self.n_cols;
        let capacity_hint = self.estimated_nnz_per_row;
        let start = ranges.first().map_or(0, |r| r.start);

        match &mut self.storage {
            Storage::Dense(a) => {
                let ax = match axis {
                    RegionAxis::Rows => Axis(0),
                    RegionAxis::Cols => Axis(1),
                };
                let (_, mut rest) = a.view_mut().split_at(ax, start);
                let mut regions = Vec::with_capacity(ranges.len());
                for range in ranges {
                    let (head, tail) = rest.split_at(ax, range.len());
                    rest = tail;
                    let (row_offset, col_offset) = match axis {
                        RegionAxis::Rows => (range.start, 0),
                        RegionAxis::Cols => (0, range.start),
                    };
                    regions.push(BlockRegion::new(
                        row_offset,
                        col_offset,
                        RegionCells::Dense(head),
                    ));
                }
                Ok(regions)
            }
            Storage::Sparse(rows) => {
                if axis == RegionAxis::Cols {
                    return Err(DatagenError::Dimension(
                        "sparse blocks can only be split by rows".to_string(),
                    ));
                }
                let mut rest: &mut [SparseRow] = &mut rows[start..];
                let mut regions = Vec::with_capacity(ranges.len());
                for range in ranges {
                    let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                    rest = tail;
                    regions.push(BlockRegion::new(
                        range.start,
                        0,
                        RegionCells::Sparse {
                            rows: head,
                            n_cols,
                            capacity_hint,
                        },
                    ));
                }
                Ok(regions)
            }
            Storage::Empty => Err(DatagenError::Dimension(format!(
                "cannot split unallocated {}x{} block",
                n_rows, n_cols
            ))),
        }
    }

    /// A single region spanning the whole block
    pub fn full_region(&mut self) -> Result<BlockRegion<'_>> {
        let n_rows = self.n_rows;
        let mut regions = self.split_regions(RegionAxis::Rows, &[0..n_rows])?;
        regions
            .pop()
            .ok_or_else(|| DatagenError::Dimension("empty block".to_string()))
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn is_sparse(&self) -> bool {
        self.sparse
    }

    /// Non-zero count as of the last `recompute_non_zeros`
    pub fn nnz(&self) -> u64 {
        self.nnz
    }

    pub fn estimated_nnz_per_row(&self) -> usize {
        self.estimated_nnz_per_row
    }

    /// True once dense or sparse storage has been allocated
    pub fn is_allocated(&self) -> bool {
        !matches!(self.storage, Storage::Empty)
    }

    /// Value at (row, col); unallocated cells read as 0
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.n_rows && col < self.n_cols,
            "Index ({}, {}) out of bounds for {}x{} block",
            row,
            col,
            self.n_rows,
            self.n_cols
        );
        match &self.storage {
            Storage::Empty => 0.0,
            Storage::Dense(a) => a[[row, col]],
            Storage::Sparse(rows) => rows[row].get(col),
        }
    }

    /// Dense values, if the block is dense and allocated
    pub fn dense_values(&self) -> Option<&Array2<f64>> {
        match &self.storage {
            Storage::Dense(a) => Some(a),
            _ => None,
        }
    }

    /// Sparse rows, if the block is sparse and allocated
    pub fn sparse_rows(&self) -> Option<&[SparseRow]> {
        match &self.storage {
            Storage::Sparse(rows) => Some(rows),
            _ => None,
        }
    }

    /// Copies the block into a dense array regardless of layout
    pub fn to_dense(&self) -> Array2<f64> {
        match &self.storage {
            Storage::Empty => Array2::zeros((self.n_rows, self.n_cols)),
            Storage::Dense(a) => a.clone(),
            Storage::Sparse(rows) => sparse_rows_to_dense(rows, self.n_cols),
        }
    }

    /// Copies the non-zero cells into an sprs CSR matrix
    pub fn to_csr(&self) -> CsMat<f64> {
        let mut row_counts = Vec::with_capacity(self.n_rows);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        match &self.storage {
            Storage::Empty => row_counts.resize(self.n_rows, 0),
            Storage::Dense(a) => {
                for row in a.outer_iter() {
                    let before = col_idx.len();
                    for (j, &v) in row.iter().enumerate() {
                        if v != 0.0 {
                            col_idx.push(j);
                            values.push(v);
                        }
                    }
                    row_counts.push(col_idx.len() - before);
                }
            }
            Storage::Sparse(rows) => {
                for row in rows {
                    let before = col_idx.len();
                    for (j, v) in row.iter() {
                        if v != 0.0 {
                            col_idx.push(j);
                            values.push(v);
                        }
                    }
                    row_counts.push(col_idx.len() - before);
                }
            }
        }

        let row_ptr = exclusive_scan(&row_counts);
        CsMat::new((self.n_rows, self.n_cols), row_ptr, col_idx, values)
    }
}

fn sparse_rows_to_dense(rows: &[SparseRow], n_cols: usize) -> Array2<f64> {
    let mut a = Array2::zeros((rows.len(), n_cols));
    for (i, row) in rows.iter().enumerate() {
        for (j, v) in row.iter() {
            a[[i, j]] = v;
        }
    }
    a
}

/// Upper-bound estimate of the sparse in-memory size in bytes
fn estimate_size_sparse_in_memory(n_rows: usize, n_cols: usize, sparsity: f64) -> f64 {
    let nnz = sparsity * n_rows as f64 * n_cols as f64;
    let non_empty_rows = (n_rows as f64).min(nnz.ceil());
    n_rows as f64 * SPARSE_ROW_POINTER_BYTES
        + non_empty_rows * SPARSE_ROW_OVERHEAD_BYTES
        + nnz * SPARSE_ENTRY_BYTES
}

/// Dense in-memory size in bytes
fn estimate_size_dense_in_memory(n_rows: usize, n_cols: usize) -> f64 {
    n_rows as f64 * n_cols as f64 * DENSE_CELL_BYTES
}

impl fmt::Debug for MatrixBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MatrixBlock {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  format: {}", if self.sparse { "sparse" } else { "dense" })?;
        writeln!(f, "  nnz: {}", self.nnz)?;

        let max_rows_to_print = 5.min(self.n_rows);
        let max_cols_to_print = 5.min(self.n_cols);
        if max_rows_to_print > 0 && self.is_allocated() {
            writeln!(f, "  content sample:")?;
            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                for j in 0..max_cols_to_print {
                    write!(f, "{:.4} ", self.get(i, j))?;
                }
                if self.n_cols > max_cols_to_print {
                    write!(f, "...")?;
                }
                writeln!(f)?;
            }
            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
