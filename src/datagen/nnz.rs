//! Per-block non-zero estimation
//!
//! Produces the expected number of non-zeros of every block, in row-major
//! block order, using one of two estimators:
//!
//! 1. **Ultra-sparse** (`expected_nnz < num_blocks`): each block receives
//!    exactly one non-zero with probability `P / (rpb*cpb) * block_area`,
//!    where `P = expected_nnz / num_blocks`, and zero otherwise. This is
//!    unbiased in expectation but can never give a block more than one
//!    non-zero, whatever the sparsity.
//! 2. **Dense/sparse** (otherwise): `floor(sparsity * block_area)`. This may
//!    under-count but never over-counts the true expectation.
//!
//! Block area accounts for truncated boundary blocks.

use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::datagen::RandomMatrixDescriptor;
use crate::error::{DatagenError, Result};
use crate::constants::MAX_NUM_BLOCKS;
use crate::utils::{block_extent, ceil_div};

enum Estimator {
    UltraSparse {
        /// Average probability of a non-zero per block
        p: f64,
        rng: Xoshiro256PlusPlus,
    },
    Proportional,
}

/// Lazy, one-shot sequence of per-block non-zero counts
///
/// Consume it exactly once, e.g. by collecting into the table generation
/// works from.
pub struct NnzPerBlock {
    next_block: usize,
    num_blocks: usize,
    num_col_blocks: usize,
    rows: usize,
    cols: usize,
    rows_per_block: usize,
    cols_per_block: usize,
    sparsity: f64,
    estimator: Estimator,
}

impl NnzPerBlock {
    /// True if the ultra-sparse estimator was selected
    pub fn is_ultra_sparse(&self) -> bool {
        matches!(self.estimator, Estimator::UltraSparse { .. })
    }
}

impl Iterator for NnzPerBlock {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next_block >= self.num_blocks {
            return None;
        }
        let i = self.next_block;
        self.next_block += 1;

        let block_rows = block_extent(self.rows, i / self.num_col_blocks, self.rows_per_block);
        let block_cols = block_extent(self.cols, i % self.num_col_blocks, self.cols_per_block);
        let area = block_rows as f64 * block_cols as f64;

        let count = match &mut self.estimator {
            Estimator::UltraSparse { p, rng } => {
                let capacity = self.rows_per_block as f64 * self.cols_per_block as f64;
                let local_p = *p / capacity * area;
                if rng.gen::<f64>() <= local_p {
                    1
                } else {
                    0
                }
            }
            Estimator::Proportional => (self.sparsity * area) as u64,
        };
        Some(count)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_blocks - self.next_block;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for NnzPerBlock {}

/// Expected non-zeros of the whole matrix, rounded up
fn expected_nnz(rows: usize, cols: usize, sparsity: f64) -> u64 {
    (rows as f64 * (cols as f64 * sparsity)).ceil() as u64
}

/// True when fewer non-zeros are expected than there are blocks
///
/// Selects the 0/1 estimator here and the single-value block fill.
pub(crate) fn is_ultra_sparse_regime(rows: usize, cols: usize, num_blocks: u64, sparsity: f64) -> bool {
    expected_nnz(rows, cols, sparsity) < num_blocks
}

/// Creates the per-block non-zero sequence for a matrix
///
/// `seed` drives the ultra-sparse coin flips; `None` draws a random seed.
///
/// # Errors
///
/// Fails with a dimension error if the block count exceeds the native signed
/// 32-bit range, or if any size argument is zero.
pub fn compute_nnz_per_block(
    rows: usize,
    cols: usize,
    rows_per_block: usize,
    cols_per_block: usize,
    sparsity: f64,
    seed: Option<u64>,
) -> Result<NnzPerBlock> {
    if rows == 0 || cols == 0 || rows_per_block == 0 || cols_per_block == 0 {
        return Err(DatagenError::Dimension(format!(
            "{}x{} with {}x{} blocks",
            rows, cols, rows_per_block, cols_per_block
        )));
    }
    let num_row_blocks = ceil_div(rows, rows_per_block);
    let num_col_blocks = ceil_div(cols, cols_per_block);
    let lnum_blocks = num_row_blocks as u64 * num_col_blocks as u64;
    if lnum_blocks > MAX_NUM_BLOCKS {
        return Err(DatagenError::Dimension(format!(
            "A random matrix of size [{},{}] can not be created. Number of blocks ({}) exceeds the maximum integer size. Try to increase the block size.",
            rows, cols, lnum_blocks
        )));
    }
    let num_blocks = lnum_blocks as usize;

    let estimator = if is_ultra_sparse_regime(rows, cols, lnum_blocks, sparsity) {
        let rng = match seed {
            Some(s) => Xoshiro256PlusPlus::seed_from_u64(s),
            None => Xoshiro256PlusPlus::from_entropy(),
        };
        Estimator::UltraSparse {
            p: expected_nnz(rows, cols, sparsity) as f64 / num_blocks as f64,
            rng,
        }
    } else {
        Estimator::Proportional
    };

    Ok(NnzPerBlock {
        next_block: 0,
        num_blocks,
        num_col_blocks,
        rows,
        cols,
        rows_per_block,
        cols_per_block,
        sparsity,
        estimator,
    })
}

/// Creates the per-block non-zero sequence for a descriptor
pub fn nnz_per_block_for(desc: &RandomMatrixDescriptor, seed: Option<u64>) -> Result<NnzPerBlock> {
    compute_nnz_per_block(
        desc.rows(),
        desc.cols(),
        desc.rows_per_block(),
        desc.cols_per_block(),
        desc.sparsity(),
        seed,
    )
}
