use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::{rngs::OsRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;
use zeroize::Zeroize;

use crate::constants::SEED_BYTES;
use crate::error::{Result, ShardError};

/// A source of uniformly distributed big integers.
///
/// Every operation that needs randomness takes one of these by mutable reference, so callers
/// decide whether it is backed by fresh OS entropy or by a fixed seed.
pub trait RandomnessSource {
    /// Returns an integer uniformly distributed in `[0, bound)`. A zero bound yields zero.
    fn sample_uniform(&mut self, bound: &BigUint) -> BigUint;

    /// Returns an integer uniformly distributed in `[0, 2^bits)`.
    fn sample_bits(&mut self, bits: u64) -> BigUint;
}

/// ChaCha20-backed randomness seeded with 256 bits.
pub struct Randomness {
    rng: ChaCha20Rng,
}

impl Randomness {
    /// Seeds a new generator from the operating system.
    ///
    /// # Errors
    ///
    /// Returns [`ShardError::EntropyUnavailable`] when the OS source fails. There is no
    /// fallback to weaker entropy.
    pub fn from_os_entropy() -> Result<Self> {
        let mut seed = [0u8; SEED_BYTES];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(ShardError::EntropyUnavailable)?;
        let rng = ChaCha20Rng::from_seed(seed);
        seed.zeroize();
        debug!("🎲 Seeded randomness from {} bytes of OS entropy", SEED_BYTES);
        Ok(Randomness { rng })
    }

    /// Builds a deterministic generator from a fixed seed. Only suitable for tests and benchmarks.
    pub fn from_seed(seed: [u8; SEED_BYTES]) -> Self {
        Randomness {
            rng: ChaCha20Rng::from_seed(seed),
        }
    }
}

impl RandomnessSource for Randomness {
    fn sample_uniform(&mut self, bound: &BigUint) -> BigUint {
        if bound.is_zero() {
            return BigUint::zero();
        }
        self.rng.gen_biguint_below(bound)
    }

    fn sample_bits(&mut self, bits: u64) -> BigUint {
        self.rng.gen_biguint(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let bound = BigUint::from(2089u32);
        let mut a = Randomness::from_seed([7u8; SEED_BYTES]);
        let mut b = Randomness::from_seed([7u8; SEED_BYTES]);

        for _ in 0..32 {
            assert_eq!(a.sample_uniform(&bound), b.sample_uniform(&bound));
            assert_eq!(a.sample_bits(256), b.sample_bits(256));
        }
    }

    #[test]
    fn test_sample_uniform_stays_below_bound() {
        let bound = BigUint::from(17u32);
        let mut rng = Randomness::from_seed([1u8; SEED_BYTES]);

        for _ in 0..500 {
            assert!(rng.sample_uniform(&bound) < bound);
        }
        assert!(rng.sample_uniform(&BigUint::zero()).is_zero());
    }

    #[test]
    fn test_sample_bits_stays_below_power_of_two() {
        let mut rng = Randomness::from_seed([2u8; SEED_BYTES]);
        let limit = BigUint::from(1u32) << 13usize;

        for _ in 0..500 {
            assert!(rng.sample_bits(13) < limit);
        }
        assert!(rng.sample_bits(0).is_zero());
    }

    #[test]
    fn test_os_entropy_sources_are_independent() -> Result<()> {
        let mut a = Randomness::from_os_entropy()?;
        let mut b = Randomness::from_os_entropy()?;

        assert_ne!(a.sample_bits(256), b.sample_bits(256));
        Ok(())
    }
}
