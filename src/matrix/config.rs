//! Configuration for matrix generation

use crate::constants::{DEFAULT_COLS_PER_BLOCK, DEFAULT_ROWS_PER_BLOCK};
use crate::datagen::RandomMatrixDescriptor;
use crate::error::Result;

/// System parameters for generation
#[derive(Debug, Clone)]
pub struct SystemParameters {
    /// Number of worker threads to use
    pub n_threads: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(), // Use all available cores
        }
    }
}

/// Configuration for the `rand_matrix` pipeline
#[derive(Debug, Clone)]
pub struct DatagenConfig {
    /// System parameters for performance tuning
    pub system_params: SystemParameters,

    /// Root seed; `None` draws a fresh random seed per call
    pub seed: Option<u64>,

    /// Seed for the ultra-sparse per-block coin flips; `None` derives it
    /// from the root seed
    pub nnz_seed: Option<u64>,

    /// Rows per block used when the caller does not choose
    pub rows_per_block: usize,

    /// Columns per block used when the caller does not choose
    pub cols_per_block: usize,
}

impl Default for DatagenConfig {
    fn default() -> Self {
        Self {
            system_params: SystemParameters::default(),
            seed: None,
            nnz_seed: None,
            rows_per_block: DEFAULT_ROWS_PER_BLOCK,
            cols_per_block: DEFAULT_COLS_PER_BLOCK,
        }
    }
}

impl DatagenConfig {
    /// Sets the root seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of worker threads
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.system_params.n_threads = n_threads;
        self
    }

    /// Sets the default block shape
    pub fn with_block_size(mut self, rows_per_block: usize, cols_per_block: usize) -> Self {
        self.rows_per_block = rows_per_block;
        self.cols_per_block = cols_per_block;
        self
    }

    /// Builds a descriptor using this configuration's block shape
    #[allow(clippy::too_many_arguments)]
    pub fn descriptor(
        &self,
        pdf: &str,
        rows: usize,
        cols: usize,
        sparsity: f64,
        min: f64,
        max: f64,
        dist_params: Option<&str>,
    ) -> Result<RandomMatrixDescriptor> {
        RandomMatrixDescriptor::new(
            pdf,
            rows,
            cols,
            self.rows_per_block,
            self.cols_per_block,
            sparsity,
            min,
            max,
            dist_params,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatagenConfig::default();
        assert!(config.system_params.n_threads >= 1);
        assert_eq!(config.seed, None);
        assert_eq!(config.rows_per_block, 1000);
        assert_eq!(config.cols_per_block, 1000);
    }

    #[test]
    fn test_builders() {
        let config = DatagenConfig::default()
            .with_seed(7)
            .with_threads(3)
            .with_block_size(10, 20);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.system_params.n_threads, 3);
        assert_eq!((config.rows_per_block, config.cols_per_block), (10, 20));
    }

    #[test]
    fn test_descriptor_uses_block_size() {
        let config = DatagenConfig::default().with_block_size(64, 32);
        let desc = config
            .descriptor("uniform", 100, 100, 0.5, 0.0, 1.0, None)
            .unwrap();
        assert_eq!((desc.rows_per_block(), desc.cols_per_block()), (64, 32));
        assert_eq!(desc.num_blocks().unwrap(), 8);
    }
}
