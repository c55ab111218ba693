//! Distribution parameter descriptor
//!
//! An immutable description of one random matrix: distribution kind, logical
//! shape, block shape, target sparsity and value parameters. It is validated
//! once at construction and shared read-only by every generation task.

use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_NUM_BLOCKS;
use crate::datagen::nnz::is_ultra_sparse_regime;
use crate::error::{DatagenError, Result};
use crate::utils::{block_extent, ceil_div};

/// Probability distribution of cell values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pdf {
    /// Uniform over `[min, max]`
    Uniform,
    /// Standard normal N(0,1)
    Normal,
    /// Poisson with a configured mean
    Poisson,
}

impl Pdf {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pdf::Uniform => "uniform",
            Pdf::Normal => "normal",
            Pdf::Poisson => "poisson",
        }
    }
}

impl fmt::Display for Pdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pdf {
    type Err = DatagenError;

    /// Parses a distribution name, ignoring case
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(Pdf::Uniform),
            "normal" => Ok(Pdf::Normal),
            "poisson" => Ok(Pdf::Poisson),
            _ => Err(DatagenError::UnsupportedDistribution {
                name: s.to_string(),
            }),
        }
    }
}

/// Returns true if a uniform matrix can be produced without sampling
///
/// That is the case for all zeros (`min == max == 0`) and for a fully dense
/// matrix of one repeated value (`sparsity == 1`, `min == max`). A NaN
/// range with `min` and `max` both NaN counts as one repeated value.
pub fn is_shortcut_rand_operation(min: f64, max: f64, sparsity: f64, pdf: Pdf) -> bool {
    let constant = min == max || (min.is_nan() && max.is_nan());
    pdf == Pdf::Uniform && ((min == 0.0 && max == 0.0) || (sparsity == 1.0 && constant))
}

/// Immutable parameters of one random matrix
#[derive(Debug, Clone, PartialEq)]
pub struct RandomMatrixDescriptor {
    pdf: Pdf,
    rows: usize,
    cols: usize,
    rows_per_block: usize,
    cols_per_block: usize,
    sparsity: f64,
    min: f64,
    max: f64,
    mean: f64,
}

impl RandomMatrixDescriptor {
    /// Creates a descriptor from a distribution name and its parameters
    ///
    /// `dist_params` is only read for `poisson`, where it must parse to a
    /// finite, positive mean.
    ///
    /// # Errors
    ///
    /// - `UnsupportedDistribution` for an unknown `pdf` name
    /// - `Configuration` for a missing or invalid Poisson mean
    /// - `Dimension` for non-positive shapes or sparsity outside `[0, 1]`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pdf: &str,
        rows: usize,
        cols: usize,
        rows_per_block: usize,
        cols_per_block: usize,
        sparsity: f64,
        min: f64,
        max: f64,
        dist_params: Option<&str>,
    ) -> Result<Self> {
        match pdf.parse::<Pdf>()? {
            Pdf::Uniform => {
                Self::uniform(rows, cols, rows_per_block, cols_per_block, sparsity, min, max)
            }
            Pdf::Normal => Self::normal(rows, cols, rows_per_block, cols_per_block, sparsity),
            Pdf::Poisson => {
                let raw = dist_params.unwrap_or("");
                let mean = raw.trim().parse::<f64>().map_err(|_| {
                    DatagenError::Configuration(format!(
                        "Failed to parse Poisson distribution parameter: {}",
                        raw
                    ))
                })?;
                Self::poisson(rows, cols, rows_per_block, cols_per_block, sparsity, min, max, mean)
            }
        }
    }

    /// Uniform values in `[min, max]`
    pub fn uniform(
        rows: usize,
        cols: usize,
        rows_per_block: usize,
        cols_per_block: usize,
        sparsity: f64,
        min: f64,
        max: f64,
    ) -> Result<Self> {
        Self::build(Pdf::Uniform, rows, cols, rows_per_block, cols_per_block, sparsity, min, max, f64::NAN)
    }

    /// Standard normal values
    pub fn normal(
        rows: usize,
        cols: usize,
        rows_per_block: usize,
        cols_per_block: usize,
        sparsity: f64,
    ) -> Result<Self> {
        Self::build(Pdf::Normal, rows, cols, rows_per_block, cols_per_block, sparsity, 0.0, 1.0, f64::NAN)
    }

    /// Poisson values with the given mean
    #[allow(clippy::too_many_arguments)]
    pub fn poisson(
        rows: usize,
        cols: usize,
        rows_per_block: usize,
        cols_per_block: usize,
        sparsity: f64,
        min: f64,
        max: f64,
        mean: f64,
    ) -> Result<Self> {
        if !mean.is_finite() || mean <= 0.0 {
            return Err(DatagenError::Configuration(format!(
                "Poisson mean must be a finite positive number, got {}",
                mean
            )));
        }
        Self::build(Pdf::Poisson, rows, cols, rows_per_block, cols_per_block, sparsity, min, max, mean)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        pdf: Pdf,
        rows: usize,
        cols: usize,
        rows_per_block: usize,
        cols_per_block: usize,
        sparsity: f64,
        min: f64,
        max: f64,
        mean: f64,
    ) -> Result<Self> {
        check_matrix_dimensions_and_sparsity(rows, cols, sparsity)?;
        if rows_per_block == 0 || cols_per_block == 0 {
            return Err(DatagenError::Dimension(format!(
                "block size must be positive, got {}x{}",
                rows_per_block, cols_per_block
            )));
        }
        Ok(Self {
            pdf,
            rows,
            cols,
            rows_per_block,
            cols_per_block,
            sparsity,
            min,
            max,
            mean,
        })
    }

    pub fn pdf(&self) -> Pdf {
        self.pdf
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows_per_block(&self) -> usize {
        self.rows_per_block
    }

    pub fn cols_per_block(&self) -> usize {
        self.cols_per_block
    }

    pub fn sparsity(&self) -> f64 {
        self.sparsity
    }

    /// Configured minimum (only meaningful for uniform)
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Configured maximum (only meaningful for uniform)
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Poisson mean; NaN for other kinds
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Effective `(min, max)` used to rescale sampler output
    ///
    /// Non-uniform kinds use `(0, 1)` so that `min + (max - min) * x`
    /// passes the sampler's native value through unchanged.
    pub fn value_range(&self) -> (f64, f64) {
        match self.pdf {
            Pdf::Uniform => (self.min, self.max),
            Pdf::Normal | Pdf::Poisson => (0.0, 1.0),
        }
    }

    /// True if generation can skip sampling entirely
    pub fn is_shortcut(&self) -> bool {
        let (min, max) = self.value_range();
        is_shortcut_rand_operation(min, max, self.sparsity, self.pdf)
    }

    /// Number of row blocks
    pub fn num_row_blocks(&self) -> usize {
        ceil_div(self.rows, self.rows_per_block)
    }

    /// Number of column blocks
    pub fn num_col_blocks(&self) -> usize {
        ceil_div(self.cols, self.cols_per_block)
    }

    /// Total number of blocks
    ///
    /// Fails if the count exceeds the native signed 32-bit range.
    pub fn num_blocks(&self) -> Result<usize> {
        let num_blocks = self.num_row_blocks() as u64 * self.num_col_blocks() as u64;
        if num_blocks > MAX_NUM_BLOCKS {
            return Err(DatagenError::Dimension(format!(
                "A random matrix of size [{},{}] can not be created. Number of blocks ({}) exceeds the maximum integer size. Try to increase the block size.",
                self.rows, self.cols, num_blocks
            )));
        }
        Ok(num_blocks as usize)
    }

    /// True if fewer non-zeros are expected than there are blocks
    ///
    /// Blocks then get at most one non-zero each.
    pub fn is_ultra_sparse(&self) -> bool {
        let num_blocks = self.num_row_blocks() as u64 * self.num_col_blocks() as u64;
        is_ultra_sparse_regime(self.rows, self.cols, num_blocks, self.sparsity)
    }

    /// Rows in row block `rbi` (the last one may be truncated)
    pub fn block_rows(&self, rbi: usize) -> usize {
        block_extent(self.rows, rbi, self.rows_per_block)
    }

    /// Columns in column block `cbj` (the last one may be truncated)
    pub fn block_cols(&self, cbj: usize) -> usize {
        block_extent(self.cols, cbj, self.cols_per_block)
    }
}

/// Validates a matrix shape and target sparsity
pub fn check_matrix_dimensions_and_sparsity(rows: usize, cols: usize, sparsity: f64) -> Result<()> {
    if rows == 0 || cols == 0 || !(0.0..=1.0).contains(&sparsity) {
        return Err(DatagenError::Dimension(format!(
            "{}x{}, {}",
            rows, cols, sparsity
        )));
    }
    Ok(())
}
