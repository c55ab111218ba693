//! Block-seed derivation
//!
//! A root seed is expanded by a small generator (SplitMix64) into 32
//! bootstrap words, which seed one WELL1024a "big generator". The big
//! generator then emits one 64-bit seed per block in row-major block order.
//! The same root seed always yields the same seed table.

use std::ops::Range;

use rand::RngCore;
use rand::SeedableRng;
use rand_xoshiro::SplitMix64;

use crate::constants::BOOTSTRAP_SEED_WORDS;
use crate::prng::Well1024a;

/// Draws a fresh random root seed
pub fn generate_random_seed() -> u64 {
    rand::random::<u64>()
}

/// Sets up the big generator for a root seed
///
/// `None` stands for an unspecified seed, in which case a random one is drawn.
pub fn setup_seeds_for_rand(seed: Option<u64>) -> Well1024a {
    let root = seed.unwrap_or_else(generate_random_seed);
    log::trace!("Setting up RandSeeds with initial seed = {}.", root);

    let mut bootstrap = SplitMix64::seed_from_u64(root);
    let mut words = [0u32; BOOTSTRAP_SEED_WORDS];
    for word in words.iter_mut() {
        *word = bootstrap.next_u32();
    }
    Well1024a::from_words(words)
}

/// Draws one seed per block, row-major over an `nrb x ncb` block grid
pub fn generate_block_seeds(bigrand: &mut Well1024a, nrb: usize, ncb: usize) -> Vec<u64> {
    (0..nrb * ncb).map(|_| bigrand.next_u64()).collect()
}

/// Extracts the seeds of a rectangular range of blocks
///
/// The result is row-major over the sub-grid, so the i-th seed still belongs
/// to the i-th block visited by a row-major walk of `rows x cols`.
pub fn slice_block_seeds(
    seeds: &[u64],
    rows: Range<usize>,
    cols: Range<usize>,
    ncb: usize,
) -> Vec<u64> {
    let width = cols.len();
    let mut sliced = Vec::with_capacity(rows.len() * width);
    for rbi in rows {
        let start = rbi * ncb + cols.start;
        sliced.extend_from_slice(&seeds[start..start + width]);
    }
    sliced
}
