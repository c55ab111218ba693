//! Standard normal generator

use super::PrnGenerator;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Standard normal N(0,1) generator
///
/// Values are unbounded; the block filler's `min + range * x` rescaling uses
/// `min = 0, max = 1` for this kind, so samples pass through unchanged.
pub struct NormalPrng {
    rng: Xoshiro256PlusPlus,
}

impl NormalPrng {
    pub fn new() -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(0),
        }
    }
}

impl Default for NormalPrng {
    fn default() -> Self {
        Self::new()
    }
}

impl PrnGenerator for NormalPrng {
    fn set_seed(&mut self, seed: u64) {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    }

    #[inline]
    fn next_f64(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }
}
