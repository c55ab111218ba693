//! WELL1024a long-period equidistributed generator
//!
//! Well Equidistributed Long-period Linear generator with a 1024-bit state
//! (32 words) and period 2^1024 - 1, following Panneton, L'Ecuyer and
//! Matsumoto. It is used once per generation call to turn a root seed into
//! one seed per block; a single small generator emitting millions of seeds
//! directly shows correlations that this two-stage scheme avoids.

use rand::{Error, RngCore, SeedableRng};

/// Number of 32-bit words in the state
const R: usize = 32;
const M1: usize = 3;
const M2: usize = 24;
const M3: usize = 10;

/// Seed type for [`Well1024a`]: 128 bytes, read as 32 little-endian words
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Well1024aSeed(pub [u8; 4 * R]);

impl Default for Well1024aSeed {
    fn default() -> Self {
        Self([0; 4 * R])
    }
}

impl AsMut<[u8]> for Well1024aSeed {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl AsRef<[u8]> for Well1024aSeed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The WELL1024a generator
#[derive(Clone, Debug)]
pub struct Well1024a {
    v: [u32; R],
    index: usize,
}

impl Well1024a {
    /// Creates a generator directly from 32 state words
    ///
    /// An all-zero state is a fixed point of the recurrence, so it is
    /// replaced by a state with a single set bit.
    pub fn from_words(words: [u32; R]) -> Self {
        let mut v = words;
        if v.iter().all(|&w| w == 0) {
            v[0] = 1;
        }
        Self { v, index: 0 }
    }

    #[inline]
    fn next_word(&mut self) -> u32 {
        let index = self.index;
        let index_rm1 = (index + R - 1) % R;

        let v0 = self.v[index];
        let vm1 = self.v[(index + M1) % R];
        let vm2 = self.v[(index + M2) % R];
        let vm3 = self.v[(index + M3) % R];

        let z0 = self.v[index_rm1];
        let z1 = v0 ^ (vm1 ^ (vm1 >> 8));
        let z2 = (vm2 ^ (vm2 << 19)) ^ (vm3 ^ (vm3 << 14));
        let z3 = z1 ^ z2;
        let z4 = (z0 ^ (z0 << 11)) ^ (z1 ^ (z1 << 7)) ^ (z2 ^ (z2 << 13));

        self.v[index] = z3;
        self.v[index_rm1] = z4;
        self.index = index_rm1;

        z4
    }
}

impl RngCore for Well1024a {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_word()) << 32;
        let low = u64::from(self.next_word());
        high | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut chunks = dest.chunks_exact_mut(8);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&self.next_u64().to_le_bytes());
        }
        let rest = chunks.into_remainder();
        if !rest.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            rest.copy_from_slice(&bytes[..rest.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Well1024a {
    type Seed = Well1024aSeed;

    fn from_seed(seed: Self::Seed) -> Self {
        let mut words = [0u32; R];
        for (word, bytes) in words.iter_mut().zip(seed.0.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        Self::from_words(words)
    }
}
