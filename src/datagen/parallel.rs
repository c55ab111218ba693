//! # Parallel block generation
//!
//! Splits the block grid into contiguous ranges of row blocks (or, for wide
//! dense outputs, column blocks) and fills each range on a bounded rayon
//! pool. Each task owns a disjoint `BlockRegion` of the output plus the seeds
//! of exactly its blocks, so tasks share nothing mutable and need no locks.

use std::ops::Range;

use rayon::prelude::*;

use crate::datagen::filler::{BlockFiller, BlockSeeds};
use crate::datagen::seeds::slice_block_seeds;
use crate::datagen::RandomMatrixDescriptor;
use crate::error::{DatagenError, Result};
use crate::matrix::{BlockRegion, MatrixBlock, RegionAxis};

/// Splits `n` items into `min(parts, n)` contiguous ranges whose lengths
/// differ by at most one
pub fn split_balanced(n: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.min(n);
    if parts == 0 {
        return Vec::new();
    }
    let base = n / parts;
    let extra = n % parts;
    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let len = base + usize::from(i < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Chooses the partition axis
///
/// Rows by default; columns only for dense outputs with fewer row blocks than
/// threads and more column blocks than row blocks.
pub fn partition_axis(sparse: bool, nrb: usize, ncb: usize, k: usize) -> RegionAxis {
    if !sparse && nrb < k && ncb > nrb {
        RegionAxis::Cols
    } else {
        RegionAxis::Rows
    }
}

/// Work of one parallel task
struct RandTask<'a> {
    id: usize,
    row_blocks: Range<usize>,
    col_blocks: Range<usize>,
    region: BlockRegion<'a>,
    seeds: Vec<u64>,
}

impl RandTask<'_> {
    fn run(mut self, desc: &RandomMatrixDescriptor, nnz: &[u64]) -> Result<()> {
        let mut filler = BlockFiller::new(desc)?;
        filler.fill_range(
            &mut self.region,
            self.row_blocks,
            self.col_blocks,
            nnz,
            BlockSeeds::Table(&self.seeds),
        )
    }
}

/// Fills `out` (already reset and allocated) with `k` parallel tasks
///
/// `seeds` is the full row-major seed table. All tasks run to completion;
/// if any failed, the failure of the lowest-numbered task is returned and
/// later failures are dropped. The output content is unspecified after a
/// failure.
pub(crate) fn generate_parallel(
    out: &mut MatrixBlock,
    desc: &RandomMatrixDescriptor,
    nnz: &[u64],
    seeds: &[u64],
    k: usize,
) -> Result<()> {
    let nrb = desc.num_row_blocks();
    let ncb = desc.num_col_blocks();
    let axis = partition_axis(out.is_sparse(), nrb, ncb, k);
    let (axis_blocks, block_len, extent) = match axis {
        RegionAxis::Rows => (nrb, desc.rows_per_block(), desc.rows()),
        RegionAxis::Cols => (ncb, desc.cols_per_block(), desc.cols()),
    };

    let block_ranges = split_balanced(axis_blocks, k);
    let cell_ranges: Vec<Range<usize>> = block_ranges
        .iter()
        .map(|r| (r.start * block_len)..(r.end * block_len).min(extent))
        .collect();

    log::debug!(
        "Parallel rand over {:?}: {} tasks for {}x{} blocks, k={}",
        axis,
        block_ranges.len(),
        nrb,
        ncb,
        k
    );

    let regions = out.split_regions(axis, &cell_ranges)?;
    let tasks: Vec<RandTask<'_>> = regions
        .into_iter()
        .zip(block_ranges)
        .enumerate()
        .map(|(id, (region, blocks))| {
            let (row_blocks, col_blocks) = match axis {
                RegionAxis::Rows => (blocks, 0..ncb),
                RegionAxis::Cols => (0..nrb, blocks),
            };
            let seeds = slice_block_seeds(seeds, row_blocks.clone(), col_blocks.clone(), ncb);
            RandTask {
                id,
                row_blocks,
                col_blocks,
                region,
                seeds,
            }
        })
        .collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(k)
        .build()
        .map_err(|e| DatagenError::task_failure(0, e))?;

    let results: Vec<(usize, Result<()>)> = pool.install(|| {
        tasks
            .into_par_iter()
            .map(|task| {
                let id = task.id;
                (id, task.run(desc, nnz))
            })
            .collect()
    });

    first_failure(results)
}

/// Returns the error of the lowest-numbered failed task, if any
fn first_failure(results: Vec<(usize, Result<()>)>) -> Result<()> {
    let mut failed = results.into_iter().filter_map(|(id, r)| r.err().map(|e| (id, e)));
    match failed.next() {
        Some((id, err)) => {
            let dropped = failed.count();
            if dropped > 0 {
                log::debug!("Dropping {} later task failures", dropped);
            }
            Err(DatagenError::task_failure(id, err))
        }
        None => Ok(()),
    }
}
