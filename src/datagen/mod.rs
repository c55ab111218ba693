//! # Random matrix generation
//!
//! The generation pipeline runs in four steps:
//!
//! 1. The non-zero estimator produces one expected count per block.
//! 2. Seed derivation expands a root seed into one seed per block.
//! 3. Blocks are filled, sequentially or by a bounded pool of tasks that
//!    each own a disjoint row or column range of the output.
//! 4. The output recounts its non-zeros and re-checks its layout.
//!
//! Thread count only affects wall-clock time. Given the same root seed and
//! descriptor the output is bit-identical for any number of threads.

mod descriptor;
mod filler;
mod nnz;
mod parallel;
mod sample;
mod seeds;
mod sequence;

pub use descriptor::{
    check_matrix_dimensions_and_sparsity, is_shortcut_rand_operation, Pdf, RandomMatrixDescriptor,
};
pub use filler::{select_fill_strategy, FillStrategy};
pub use nnz::{compute_nnz_per_block, nnz_per_block_for, NnzPerBlock};
pub use parallel::{partition_axis, split_balanced};
pub use sample::generate_sample;
pub use seeds::{generate_block_seeds, generate_random_seed, setup_seeds_for_rand, slice_block_seeds};
pub use sequence::{generate_sequence, update_seq_incr};

use crate::constants::PAR_NUMCELL_THRESHOLD;
use crate::error::{DatagenError, Result};
use crate::matrix::{DatagenConfig, MatrixBlock};
use crate::prng::Well1024a;

use filler::{BlockFiller, BlockSeeds};

/// Source of block seeds for one generation call
pub enum SeedSource {
    /// Big generator set up from a root seed; draws one seed per block
    Root(Well1024a),
    /// One seed standing in for every block (single-block mode)
    Block(u64),
}

/// Generates a random matrix into `out`
///
/// `nnz_per_block` is consumed once into a row-major table with at least
/// one entry per block. With `SeedSource::Root` the work is spread over up
/// to `k` threads when the output is large enough; `SeedSource::Block`
/// always runs sequentially and sizes the output layout from the first
/// table entry.
///
/// # Errors
///
/// - `Dimension` if the block count overflows or the table is too short
/// - `Configuration` if the value sampler cannot be built
/// - `TaskFailure` for the first failed parallel task; `out` is then
///   left partially filled
pub fn generate_random_matrix<I>(
    out: &mut MatrixBlock,
    desc: &RandomMatrixDescriptor,
    nnz_per_block: I,
    seeds: SeedSource,
    k: usize,
) -> Result<()>
where
    I: IntoIterator<Item = u64>,
{
    let rows = desc.rows();
    let cols = desc.cols();

    if desc.is_shortcut() {
        if desc.min() == 0.0 && desc.max() == 0.0 {
            log::debug!("Shortcut: all-zero {}x{} output", rows, cols);
            out.reset(rows, cols, true, 0);
        } else {
            log::debug!("Shortcut: constant {} over {}x{}", desc.min(), rows, cols);
            out.reset_filled(rows, cols, desc.min());
        }
        return Ok(());
    }

    let nrb = desc.num_row_blocks();
    let ncb = desc.num_col_blocks();
    let num_blocks = desc.num_blocks()?;
    let nnz: Vec<u64> = nnz_per_block.into_iter().collect();
    if nnz.len() < num_blocks {
        return Err(DatagenError::Dimension(format!(
            "non-zero table has {} entries for {} blocks",
            nnz.len(),
            num_blocks
        )));
    }

    let estimated_nnz = match seeds {
        SeedSource::Root(_) => (desc.sparsity() * rows as f64 * cols as f64) as u64,
        SeedSource::Block(_) => nnz[0],
    };
    let sparse = MatrixBlock::eval_sparse_format_in_memory(rows, cols, estimated_nnz);
    out.reset(rows, cols, sparse, estimated_nnz);
    if sparse {
        out.allocate_sparse_rows_block();
    } else {
        out.allocate_dense_block();
    }

    match seeds {
        SeedSource::Root(mut bigrand) => {
            let seed_table = generate_block_seeds(&mut bigrand, nrb, ncb);
            let cells = rows as u64 * cols as u64;
            let axis = partition_axis(sparse, nrb, ncb, k);
            let use_parallel = k > 1
                && !(rows <= desc.rows_per_block() && sparse)
                && cells >= PAR_NUMCELL_THRESHOLD
                && out.is_thread_safe(axis);
            if use_parallel {
                parallel::generate_parallel(out, desc, &nnz, &seed_table, k)?;
            } else {
                log::debug!(
                    "Sequential rand: {}x{} ({} layout), k={}",
                    rows,
                    cols,
                    if sparse { "sparse" } else { "dense" },
                    k
                );
                let mut region = out.full_region()?;
                BlockFiller::new(desc)?.fill_range(
                    &mut region,
                    0..nrb,
                    0..ncb,
                    &nnz,
                    BlockSeeds::Table(&seed_table),
                )?;
            }
        }
        SeedSource::Block(seed) => {
            let mut region = out.full_region()?;
            BlockFiller::new(desc)?.fill_range(
                &mut region,
                0..nrb,
                0..ncb,
                &nnz,
                BlockSeeds::Single(seed),
            )?;
        }
    }

    out.recompute_non_zeros();
    out.examine_sparsity();
    Ok(())
}

/// Runs the whole pipeline for one descriptor and returns the new matrix
///
/// Uses `config.seed` as the root seed (random when unset) and
/// `config.nnz_seed` for the ultra-sparse estimator (the root seed when
/// unset).
pub fn rand_matrix(desc: &RandomMatrixDescriptor, config: &DatagenConfig) -> Result<MatrixBlock> {
    let seed = config.seed.unwrap_or_else(generate_random_seed);
    let nnz = nnz_per_block_for(desc, Some(config.nnz_seed.unwrap_or(seed)))?;
    let bigrand = setup_seeds_for_rand(Some(seed));

    let mut out = MatrixBlock::new(desc.rows(), desc.cols(), false);
    generate_random_matrix(
        &mut out,
        desc,
        nnz,
        SeedSource::Root(bigrand),
        config.system_params.n_threads,
    )?;
    Ok(out)
}
