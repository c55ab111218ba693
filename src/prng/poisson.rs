//! Poisson generator

use super::PrnGenerator;
use crate::error::{DatagenError, Result};
use rand::SeedableRng;
use rand_distr::{Distribution, Poisson};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Poisson generator with a fixed mean
pub struct PoissonPrng {
    mean: f64,
    dist: Poisson<f64>,
    rng: Xoshiro256PlusPlus,
}

impl PoissonPrng {
    /// Creates a generator for the given mean
    ///
    /// Fails with a configuration error unless `mean` is finite and positive.
    pub fn new(mean: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(DatagenError::Configuration(format!(
                "Poisson mean must be a finite number, got {}",
                mean
            )));
        }
        let dist = Poisson::new(mean).map_err(|e| {
            DatagenError::Configuration(format!("Invalid Poisson mean {}: {}", mean, e))
        })?;
        Ok(Self {
            mean,
            dist,
            rng: Xoshiro256PlusPlus::seed_from_u64(0),
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }
}

impl PrnGenerator for PoissonPrng {
    fn set_seed(&mut self, seed: u64) {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    }

    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_counts() {
        let mut prng = PoissonPrng::new(4.0).unwrap();
        prng.set_seed(5);
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let x = prng.next_f64();
            assert!(x >= 0.0);
            assert_eq!(x, x.trunc());
            sum += x;
        }
        let mean = sum / n as f64;
        assert!((mean - 4.0).abs() < 0.1, "mean {}", mean);
    }

    #[test]
    fn test_invalid_means() {
        assert!(PoissonPrng::new(f64::NAN).is_err());
        assert!(PoissonPrng::new(f64::INFINITY).is_err());
        assert!(PoissonPrng::new(0.0).is_err());
        assert!(PoissonPrng::new(-2.5).is_err());
        assert_eq!(PoissonPrng::new(2.5).unwrap().mean(), 2.5);
    }
}
