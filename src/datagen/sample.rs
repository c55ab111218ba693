//! Random sampling from `[1, range]`
//!
//! Without replacement uses reservoir sampling followed by a shuffle: the
//! reservoir gives a uniform subset but keeps early values near their
//! initial slots, which the shuffle removes. With replacement draws each
//! element independently with an unbiased bounded generator.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::datagen::seeds::generate_random_seed;
use crate::error::{DatagenError, Result};
use crate::matrix::MatrixBlock;

/// Fills `out` with a `size x 1` sample of values from `[1, range]`
///
/// `seed` of `None` draws a random seed.
///
/// # Errors
///
/// `Argument` if `range <= 0`, `size == 0`, or `size > range` without
/// replacement.
pub fn generate_sample(
    out: &mut MatrixBlock,
    range: i64,
    size: usize,
    replace: bool,
    seed: Option<u64>,
) -> Result<()> {
    if range <= 0 {
        return Err(DatagenError::Argument(format!(
            "Sample range must be positive, got {}",
            range
        )));
    }
    if size == 0 {
        return Err(DatagenError::Argument(
            "Sample size must be positive".to_string(),
        ));
    }
    let range = range as u64;
    if !replace && size as u64 > range {
        return Err(DatagenError::Argument(format!(
            "Sample (size={}) larger than population (size={}) can only be generated with replacement",
            size, range
        )));
    }

    let seed = seed.unwrap_or_else(generate_random_seed);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let sample = if replace {
        sample_with_replacement(&mut rng, range, size)
    } else {
        sample_without_replacement(&mut rng, range, size)
    };

    out.reset(size, 1, false, size as u64);
    out.allocate_dense_block();
    {
        let mut region = out.full_region()?;
        for (i, &v) in sample.iter().enumerate() {
            region.put(i, 0, v as f64);
        }
    }
    out.recompute_non_zeros();
    out.examine_sparsity();
    Ok(())
}

/// Reservoir sample of `size` distinct values from `[1, range]`, shuffled
fn sample_without_replacement<R: Rng>(rng: &mut R, range: u64, size: usize) -> Vec<u64> {
    let mut reservoir: Vec<u64> = (1..=size as u64).collect();
    let k = size as u64;
    for i in (k + 1)..=range {
        if rng.gen_range(0..i) < k {
            let slot = rng.gen_range(0..size);
            reservoir[slot] = i;
        }
    }
    reservoir.shuffle(rng);
    reservoir
}

/// `size` independent draws from `[1, range]`
fn sample_with_replacement<R: RngCore>(rng: &mut R, range: u64, size: usize) -> Vec<u64> {
    (0..size).map(|_| 1 + bounded_u64(rng, range)).collect()
}

/// Uniform value in `[0, n)` for `0 < n < 2^63`
///
/// Draws 63-bit values and rejects those from the incomplete top interval,
/// detected as `bits - val + (n - 1)` overflowing the signed 64-bit range.
fn bounded_u64<R: RngCore>(rng: &mut R, n: u64) -> u64 {
    debug_assert!(n > 0 && n <= i64::MAX as u64);
    loop {
        let bits = rng.next_u64() >> 1;
        let val = bits % n;
        if bits - val + (n - 1) <= i64::MAX as u64 {
            return val;
        }
    }
}
