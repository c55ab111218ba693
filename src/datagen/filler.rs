//! Block value filling
//!
//! Fills the cells of one block from its seed and its non-zero budget. Two
//! generators are seeded with the block seed: the value generator for the
//! configured distribution, and a uniform occupancy generator that decides
//! which cells are populated. The occupancy generator is jumped ahead after
//! seeding so the two streams never overlap. Occupancy is always uniform,
//! whatever the value distribution.
//!
//! In the ultra-sparse regime the non-zero table already decided which
//! blocks hold a value: each such block gets exactly one, at a uniformly
//! drawn cell.
//!
//! The local layout of each block is evaluated on its own (boundary blocks
//! can be denser or sparser than the matrix as a whole) and selects one of
//! three strategies:
//!
//! - **Geometric skip** (locally sparse): gaps between populated cells of a
//!   Bernoulli(sparsity) pattern are geometric, so the filler jumps
//!   `ceil(ln(u) / ln(1 - sparsity)) - 1` cells at a time.
//! - **Full** (locally dense, sparsity 1): every cell gets a value.
//! - **Occupancy test** (locally dense, sparsity < 1): each cell is
//!   populated when its occupancy draw is `<= sparsity`.
//!
//! A block never receives more values than its budget from the non-zero
//! table. The result depends only on the block seed and budget, never on
//! which thread fills the block or in what order.

use std::ops::Range;

use crate::datagen::RandomMatrixDescriptor;
use crate::error::{DatagenError, Result};
use crate::matrix::{BlockRegion, MatrixBlock};
use crate::prng::{value_prng, PrnGenerator, UniformPrng};

/// Where a block's seed comes from
#[derive(Debug, Clone, Copy)]
pub(crate) enum BlockSeeds<'s> {
    /// Row-major seeds of exactly the blocks being filled
    Table(&'s [u64]),
    /// One seed standing in for every block
    Single(u64),
}

/// Local fill strategy chosen for a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStrategy {
    GeometricSkip,
    Full,
    OccupancyTest,
}

/// Chooses the fill strategy for a block of the given extent and budget
pub fn select_fill_strategy(block_rows: usize, block_cols: usize, budget: u64, sparsity: f64) -> FillStrategy {
    if MatrixBlock::eval_sparse_format_in_memory(block_rows, block_cols, budget) {
        FillStrategy::GeometricSkip
    } else if sparsity == 1.0 {
        FillStrategy::Full
    } else {
        FillStrategy::OccupancyTest
    }
}

/// Fills blocks of one descriptor into a region
pub(crate) struct BlockFiller<'d> {
    desc: &'d RandomMatrixDescriptor,
    value_prng: Box<dyn PrnGenerator>,
    nnz_prng: UniformPrng,
    min: f64,
    range: f64,
    ultra_sparse: bool,
}

impl<'d> BlockFiller<'d> {
    pub(crate) fn new(desc: &'d RandomMatrixDescriptor) -> Result<Self> {
        let (min, max) = desc.value_range();
        Ok(Self {
            desc,
            value_prng: value_prng(desc.pdf(), desc.mean())?,
            nnz_prng: UniformPrng::new(),
            min,
            range: max - min,
            ultra_sparse: desc.is_ultra_sparse(),
        })
    }

    /// Fills every block in `row_blocks x col_blocks`, row-major
    ///
    /// `nnz` is the full per-block table of the matrix, indexed by global
    /// block id. With `BlockSeeds::Table` the table holds the seeds of the
    /// visited blocks only, in visiting order.
    pub(crate) fn fill_range(
        &mut self,
        region: &mut BlockRegion<'_>,
        row_blocks: Range<usize>,
        col_blocks: Range<usize>,
        nnz: &[u64],
        seeds: BlockSeeds<'_>,
    ) -> Result<()> {
        let ncb = self.desc.num_col_blocks();
        let mut counter = 0;
        for rbi in row_blocks {
            for cbj in col_blocks.clone() {
                let seed = match seeds {
                    BlockSeeds::Table(table) => {
                        let seed = table.get(counter).copied().ok_or_else(|| {
                            DatagenError::Dimension(format!(
                                "seed table of length {} has no seed for block ({}, {})",
                                table.len(),
                                rbi,
                                cbj
                            ))
                        })?;
                        counter += 1;
                        seed
                    }
                    BlockSeeds::Single(seed) => seed,
                };
                let block_id = rbi * ncb + cbj;
                let budget = nnz.get(block_id).copied().ok_or_else(|| {
                    DatagenError::Dimension(format!(
                        "non-zero table of length {} has no entry for block {}",
                        nnz.len(),
                        block_id
                    ))
                })?;
                self.fill_block(region, rbi, cbj, seed, budget);
            }
        }
        Ok(())
    }

    /// Fills block (rbi, cbj) from its seed; returns the number of values placed
    pub(crate) fn fill_block(
        &mut self,
        region: &mut BlockRegion<'_>,
        rbi: usize,
        cbj: usize,
        seed: u64,
        budget: u64,
    ) -> u64 {
        let sparsity = self.desc.sparsity();
        if budget == 0 || sparsity <= 0.0 {
            return 0;
        }

        let block_rows = self.desc.block_rows(rbi);
        let block_cols = self.desc.block_cols(cbj);
        let row_offset = rbi * self.desc.rows_per_block();
        let col_offset = cbj * self.desc.cols_per_block();

        self.reseed(seed);

        if self.ultra_sparse {
            let block_size = block_rows as u64 * block_cols as u64;
            let idx = ((self.nnz_prng.next_f64() * block_size as f64) as u64).min(block_size - 1);
            let ridx = (idx / block_cols as u64) as usize;
            let cidx = (idx % block_cols as u64) as usize;
            let value = self.next_value();
            region.put(row_offset + ridx, col_offset + cidx, value);
            return 1;
        }

        match select_fill_strategy(block_rows, block_cols, budget, sparsity) {
            FillStrategy::GeometricSkip => {
                let log1mp = (1.0 - sparsity).ln();
                let block_size = block_rows as u64 * block_cols as u64;
                let mut idx: u64 = 0; // 1-based index of the last landed cell
                let mut placed = 0;
                while idx < block_size && placed < budget {
                    let u = self.nnz_prng.next_f64();
                    let skip = ((u.ln() / log1mp).ceil() - 1.0).max(0.0) as u64;
                    idx = idx.saturating_add(skip).saturating_add(1);
                    if idx > block_size {
                        break;
                    }
                    let ridx = ((idx - 1) / block_cols as u64) as usize;
                    let cidx = ((idx - 1) % block_cols as u64) as usize;
                    let value = self.next_value();
                    region.put(row_offset + ridx, col_offset + cidx, value);
                    placed += 1;
                }
                placed
            }
            FillStrategy::Full => {
                for ii in 0..block_rows {
                    for jj in 0..block_cols {
                        let value = self.next_value();
                        region.put(row_offset + ii, col_offset + jj, value);
                    }
                }
                block_rows as u64 * block_cols as u64
            }
            FillStrategy::OccupancyTest => {
                let mut placed = 0;
                'rows: for ii in 0..block_rows {
                    for jj in 0..block_cols {
                        if placed >= budget {
                            break 'rows;
                        }
                        if self.nnz_prng.next_f64() <= sparsity {
                            let value = self.next_value();
                            region.put(row_offset + ii, col_offset + jj, value);
                            placed += 1;
                        }
                    }
                }
                placed
            }
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.value_prng.set_seed(seed);
        self.nnz_prng.set_seed(seed);
        self.nnz_prng.jump();
    }

    #[inline]
    fn next_value(&mut self) -> f64 {
        self.min + self.range * self.value_prng.next_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense_block(rows: usize, cols: usize) -> MatrixBlock {
        let mut block = MatrixBlock::new(rows, cols, false);
        block.allocate_dense_block();
        block
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(select_fill_strategy(100, 100, 100, 0.01), FillStrategy::GeometricSkip);
        assert_eq!(select_fill_strategy(100, 100, 10_000, 1.0), FillStrategy::Full);
        assert_eq!(select_fill_strategy(100, 100, 5_000, 0.5), FillStrategy::OccupancyTest);
    }

    #[test]
    fn test_full_fill_within_range() {
        let desc = RandomMatrixDescriptor::uniform(10, 10, 10, 10, 1.0, -2.0, 3.0).unwrap();
        let mut block = dense_block(10, 10);
        let placed = {
            let mut region = block.full_region().unwrap();
            let mut filler = BlockFiller::new(&desc).unwrap();
            filler.fill_block(&mut region, 0, 0, 17, 100)
        };
        assert_eq!(placed, 100);
        let values = block.dense_values().unwrap();
        assert!(values.iter().all(|&v| (-2.0..3.0).contains(&v)));
    }

    #[test]
    fn test_budget_caps_occupancy_fill() {
        let desc = RandomMatrixDescriptor::uniform(50, 50, 50, 50, 0.6, 1.0, 2.0).unwrap();
        let mut block = dense_block(50, 50);
        let budget = (0.6 * 2500.0) as u64;
        let placed = {
            let mut region = block.full_region().unwrap();
            BlockFiller::new(&desc)
                .unwrap()
                .fill_block(&mut region, 0, 0, 5, budget)
        };
        assert!(placed <= budget);
        assert_eq!(block.recompute_non_zeros(), placed);
    }

    #[test]
    fn test_geometric_skip_places_at_most_budget() {
        let desc = RandomMatrixDescriptor::uniform(200, 200, 200, 200, 0.01, 1.0, 2.0).unwrap();
        let mut block = MatrixBlock::new(200, 200, true);
        block.allocate_sparse_rows_block();
        let placed = {
            let mut region = block.full_region().unwrap();
            BlockFiller::new(&desc)
                .unwrap()
                .fill_block(&mut region, 0, 0, 99, 400)
        };
        assert!(placed <= 400);
        // Bernoulli(0.01) over 40_000 cells, capped at its floor expectation
        assert!(placed > 300, "placed {}", placed);
        assert_eq!(block.recompute_non_zeros(), placed);
    }

    #[test]
    fn test_ultra_sparse_block_gets_exactly_one_value() {
        // 4 expected non-zeros over 400 blocks of 10x10
        let desc = RandomMatrixDescriptor::uniform(200, 200, 10, 10, 0.0001, 1.0, 2.0).unwrap();
        assert!(desc.is_ultra_sparse());
        let mut cells = std::collections::HashSet::new();
        for seed in 0..50 {
            let mut block = dense_block(200, 200);
            {
                let mut region = block.full_region().unwrap();
                let placed = BlockFiller::new(&desc)
                    .unwrap()
                    .fill_block(&mut region, 3, 4, seed, 1);
                assert_eq!(placed, 1);
            }
            assert_eq!(block.recompute_non_zeros(), 1);
            let dense = block.to_dense();
            let (pos, _) = dense
                .indexed_iter()
                .find(|(_, &v)| v != 0.0)
                .unwrap();
            assert!((30..40).contains(&pos.0) && (40..50).contains(&pos.1), "cell {:?}", pos);
            cells.insert(pos);
        }
        // the cell is drawn, not fixed
        assert!(cells.len() > 10, "{} distinct cells", cells.len());
    }

    #[test]
    fn test_occupancy_stream_independent_of_values() {
        let desc = RandomMatrixDescriptor::uniform(10, 10, 10, 10, 0.5, 0.0, 1.0).unwrap();
        let mut filler = BlockFiller::new(&desc).unwrap();
        filler.reseed(42);
        let values: Vec<f64> = (0..64).map(|_| filler.value_prng.next_f64()).collect();
        let occupancy: Vec<f64> = (0..64).map(|_| filler.nnz_prng.next_f64()).collect();
        assert!(values.iter().zip(&occupancy).all(|(v, o)| v != o));
    }

    #[test]
    fn test_geometric_gaps_do_not_follow_values() {
        // With one shared stream every uniform value would fix its own gap
        let p = 0.01;
        let desc = RandomMatrixDescriptor::uniform(400, 400, 400, 400, p, 0.0, 1.0).unwrap();
        let mut block = MatrixBlock::new(400, 400, true);
        block.allocate_sparse_rows_block();
        let placed = {
            let mut region = block.full_region().unwrap();
            BlockFiller::new(&desc)
                .unwrap()
                .fill_block(&mut region, 0, 0, 7, 1600)
        };
        assert!(placed > 1000, "placed {}", placed);

        let log1mp = (1.0 - p).ln();
        let mut prev: i64 = -1;
        let mut matching = 0;
        for ((i, j), &v) in block.to_dense().indexed_iter() {
            if v == 0.0 {
                continue;
            }
            let idx = (i * 400 + j) as i64;
            let gap = idx - prev;
            prev = idx;
            if (v.ln() / log1mp).ceil() as i64 == gap {
                matching += 1;
            }
        }
        // independent streams agree on roughly p / (2 - p) of the gaps
        assert!(matching * 10 < placed, "{} of {} gaps match", matching, placed);
    }

    #[test]
    fn test_zero_budget_leaves_block_empty() {
        let desc = RandomMatrixDescriptor::uniform(20, 20, 20, 20, 0.3, 1.0, 2.0).unwrap();
        let mut block = dense_block(20, 20);
        {
            let mut region = block.full_region().unwrap();
            let placed = BlockFiller::new(&desc)
                .unwrap()
                .fill_block(&mut region, 0, 0, 1, 0);
            assert_eq!(placed, 0);
        }
        assert_eq!(block.recompute_non_zeros(), 0);
    }

    #[test]
    fn test_same_seed_same_block() {
        let desc = RandomMatrixDescriptor::normal(30, 30, 30, 30, 0.5).unwrap();
        let fill = |seed| {
            let mut block = dense_block(30, 30);
            {
                let mut region = block.full_region().unwrap();
                BlockFiller::new(&desc)
                    .unwrap()
                    .fill_block(&mut region, 0, 0, seed, 450);
            }
            block.to_dense()
        };
        assert_eq!(fill(8), fill(8));
        assert_ne!(fill(8), fill(9));
    }

    #[test]
    fn test_boundary_block_offsets() {
        // 15x15 with 10x10 blocks: block (1,1) is 5x5 at offset (10,10)
        let desc = RandomMatrixDescriptor::uniform(15, 15, 10, 10, 1.0, 1.0, 2.0).unwrap();
        let mut block = dense_block(15, 15);
        {
            let mut region = block.full_region().unwrap();
            let placed = BlockFiller::new(&desc)
                .unwrap()
                .fill_block(&mut region, 1, 1, 4, 25);
            assert_eq!(placed, 25);
        }
        assert_eq!(block.get(9, 9), 0.0);
        assert!(block.get(10, 10) >= 1.0);
        assert!(block.get(14, 14) >= 1.0);
        assert_eq!(block.recompute_non_zeros(), 25);
    }

    #[test]
    fn test_fill_range_checks_table_lengths() {
        let desc = RandomMatrixDescriptor::uniform(20, 20, 10, 10, 1.0, 1.0, 2.0).unwrap();
        let mut block = dense_block(20, 20);
        let mut region = block.full_region().unwrap();
        let mut filler = BlockFiller::new(&desc).unwrap();
        let nnz = vec![100; 4];
        let short_seeds = vec![1u64; 2];
        assert!(filler
            .fill_range(&mut region, 0..2, 0..2, &nnz, BlockSeeds::Table(&short_seeds))
            .is_err());
        assert!(filler
            .fill_range(&mut region, 0..2, 0..2, &nnz[..3], BlockSeeds::Single(1))
            .is_err());
    }
}
