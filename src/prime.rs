use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::debug;

use crate::constants::SMALL_PRIMES;
use crate::error::{Result, ShardError};
use crate::rng::RandomnessSource;

/// Generates a probable prime with at least `bits` bits.
///
/// A `bits`-bit integer is drawn from `rng` (top bit forced) and advanced to the next prime at or
/// above it. The search is deterministic once the starting point is drawn and has no iteration cap.
pub fn generate_prime(bits: u64, rng: &mut impl RandomnessSource) -> Result<BigUint> {
    if bits < 2 {
        return Err(ShardError::InvalidParameters(format!(
            "cannot generate a {bits}-bit prime"
        )));
    }

    let start = rng.sample_bits(bits) | (BigUint::one() << (bits - 1));
    let prime = next_prime(&start);
    debug!("🔢 Generated {}-bit prime", prime.bits());
    Ok(prime)
}

/// Smallest probable prime greater than or equal to `n`.
pub fn next_prime(n: &BigUint) -> BigUint {
    let two = BigUint::from(2u32);
    if n <= &two {
        return two;
    }

    let mut candidate = n.clone();
    if (&candidate % &two).is_zero() {
        candidate += 1u32;
    }
    while !is_probable_prime(&candidate) {
        candidate += 2u32;
    }
    candidate
}

/// Trial division by small primes followed by Miller-Rabin with those same primes as witnesses.
pub fn is_probable_prime(n: &BigUint) -> bool {
    if n < &BigUint::from(2u32) {
        return false;
    }
    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_one = n - BigUint::one();
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for &a in SMALL_PRIMES.iter() {
        let mut x = BigUint::from(a).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Randomness;

    #[test]
    fn test_small_values() {
        let primes = [2u32, 3, 5, 173, 179, 2089, 7919, 65537];
        let composites = [0u32, 1, 4, 9, 561, 1105, 2088, 8911, 179 * 181];

        for p in primes {
            assert!(is_probable_prime(&BigUint::from(p)), "{p} should be prime");
        }
        for c in composites {
            assert!(!is_probable_prime(&BigUint::from(c)), "{c} should be composite");
        }
    }

    #[test]
    fn test_large_values() {
        let m61 = (BigUint::one() << 61usize) - BigUint::one();
        let m127 = (BigUint::one() << 127usize) - BigUint::one();
        let m31 = (BigUint::one() << 31usize) - BigUint::one();

        assert!(is_probable_prime(&m61));
        assert!(is_probable_prime(&m127));
        assert!(!is_probable_prime(&(&m61 * &m31)));
        assert!(!is_probable_prime(&(&m127 * &m61)));
    }

    #[test]
    fn test_next_prime_at_or_above() {
        assert_eq!(next_prime(&BigUint::from(0u32)), BigUint::from(2u32));
        assert_eq!(next_prime(&BigUint::from(2088u32)), BigUint::from(2089u32));
        assert_eq!(next_prime(&BigUint::from(2089u32)), BigUint::from(2089u32));
        assert_eq!(next_prime(&BigUint::from(2090u32)), BigUint::from(2099u32));
    }

    #[test]
    fn test_generate_prime_bit_length() -> Result<()> {
        let mut rng = Randomness::from_seed([3u8; 32]);
        for bits in [8u64, 64, 128, 256] {
            let prime = generate_prime(bits, &mut rng)?;
            assert!(prime.bits() >= bits);
            assert!(prime.bits() <= bits + 1);
            assert!(is_probable_prime(&prime));
        }
        Ok(())
    }

    #[test]
    fn test_generate_prime_is_seed_deterministic() -> Result<()> {
        let a = generate_prime(128, &mut Randomness::from_seed([9u8; 32]))?;
        let b = generate_prime(128, &mut Randomness::from_seed([9u8; 32]))?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_generate_prime_rejects_tiny_lengths() {
        let mut rng = Randomness::from_seed([0u8; 32]);
        assert!(generate_prime(1, &mut rng).is_err());
        assert!(generate_prime(0, &mut rng).is_err());
    }
}
