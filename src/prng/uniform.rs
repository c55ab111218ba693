//! Uniform `[0, 1)` generator

use super::PrnGenerator;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Uniform generator over `[0, 1)`
///
/// Serves both as the value sampler for `uniform` matrices and as the
/// occupancy sampler deciding which cells hold a value.
pub struct UniformPrng {
    rng: Xoshiro256PlusPlus,
}

impl UniformPrng {
    /// Creates a generator seeded with 0; call `set_seed` before use
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Creates a generator with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Advances the stream by 2^128 draws
    ///
    /// After `set_seed(s)` and `jump()` the stream no longer overlaps the
    /// one any other Xoshiro-backed generator produces from `s`.
    pub fn jump(&mut self) {
        self.rng.jump();
    }
}

impl Default for UniformPrng {
    fn default() -> Self {
        Self::new()
    }
}

impl PrnGenerator for UniformPrng {
    fn set_seed(&mut self, seed: u64) {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    }

    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        let mut prng = UniformPrng::with_seed(7);
        for _ in 0..10_000 {
            let u = prng.next_f64();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_jump_leaves_seeded_stream() {
        let mut plain = UniformPrng::with_seed(11);
        let mut jumped = UniformPrng::with_seed(11);
        jumped.jump();
        let a: Vec<f64> = (0..64).map(|_| plain.next_f64()).collect();
        let b: Vec<f64> = (0..64).map(|_| jumped.next_f64()).collect();
        assert!(a.iter().all(|v| !b.contains(v)));

        let mut again = UniformPrng::with_seed(11);
        again.jump();
        assert_eq!(again.next_f64(), b[0]);
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let mut prng = UniformPrng::with_seed(11);
        let first: Vec<f64> = (0..8).map(|_| prng.next_f64()).collect();
        prng.set_seed(11);
        let second: Vec<f64> = (0..8).map(|_| prng.next_f64()).collect();
        assert_eq!(first, second);
    }
}
