use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Result, ShardError};

/// Arithmetic in `Z/pZ` for a prime modulus `p`.
///
/// The modulus is fixed for the lifetime of a sharing session and never mutated, so a field can
/// be shared freely between independent operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
}

impl PrimeField {
    /// Wraps `modulus` as a field. Primality is the caller's responsibility; only moduli below
    /// two are rejected.
    pub fn new(modulus: BigUint) -> Result<Self> {
        if modulus < BigUint::from(2u32) {
            return Err(ShardError::InvalidParameters(format!(
                "modulus {modulus} is too small"
            )));
        }
        Ok(PrimeField { modulus })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn reduce(&self, a: &BigUint) -> BigUint {
        a % &self.modulus
    }

    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.modulus
    }

    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let b = b % &self.modulus;
        (a + &self.modulus - b) % &self.modulus
    }

    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    /// `base^exponent mod p`. The exponent is used as given, not reduced.
    pub fn pow(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        base.modpow(exponent, &self.modulus)
    }

    /// Returns the unique `y` with `a * y ≡ 1 (mod p)`.
    ///
    /// # Errors
    ///
    /// [`ShardError::NotInvertible`] when `gcd(a, p) != 1`, which includes every multiple of `p`.
    pub fn inverse(&self, a: &BigUint) -> Result<BigUint> {
        let reduced = self.reduce(a);
        if reduced.is_zero() {
            return Err(self.not_invertible(a));
        }
        reduced
            .modinv(&self.modulus)
            .ok_or_else(|| self.not_invertible(a))
    }

    /// Whether `a` is a canonical element, i.e. strictly below the modulus.
    pub fn contains(&self, a: &BigUint) -> bool {
        a < &self.modulus
    }

    pub fn one(&self) -> BigUint {
        BigUint::one() % &self.modulus
    }

    fn not_invertible(&self, a: &BigUint) -> ShardError {
        ShardError::NotInvertible {
            value: a.clone(),
            modulus: self.modulus.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> PrimeField {
        PrimeField::new(BigUint::from(2089u32)).unwrap()
    }

    fn n(v: u32) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_add_sub_mul_wrap() {
        let f = field();
        assert_eq!(f.add(&n(2000), &n(100)), n(11));
        assert_eq!(f.sub(&n(5), &n(10)), n(2084));
        assert_eq!(f.sub(&n(10), &n(2089 + 4)), n(6));
        assert_eq!(f.mul(&n(1000), &n(1000)), n(1_000_000 % 2089));
        assert_eq!(f.reduce(&n(4178)), n(0));
    }

    #[test]
    fn test_pow_matches_fermat() {
        let f = field();
        for base in [2u32, 3, 42, 2088] {
            assert_eq!(f.pow(&n(base), &n(2088)), n(1));
        }
        assert_eq!(f.pow(&n(3), &n(0)), n(1));
    }

    #[test]
    fn test_inverse() {
        let f = field();
        for a in [1u32, 2, 7, 1044, 2088, 5000] {
            let inv = f.inverse(&n(a)).unwrap();
            assert_eq!(f.mul(&n(a), &inv), n(1));
        }
    }

    #[test]
    fn test_inverse_of_multiple_of_modulus_fails() {
        let f = field();
        assert!(matches!(
            f.inverse(&n(0)),
            Err(ShardError::NotInvertible { .. })
        ));
        assert!(matches!(
            f.inverse(&n(4178)),
            Err(ShardError::NotInvertible { .. })
        ));

        // composite modulus: gcd(6, 15) = 3
        let composite = PrimeField::new(n(15)).unwrap();
        assert!(composite.inverse(&n(6)).is_err());
    }

    #[test]
    fn test_tiny_modulus_rejected() {
        assert!(PrimeField::new(n(1)).is_err());
        assert!(PrimeField::new(n(0)).is_err());
        assert!(PrimeField::new(n(2)).is_ok());
    }
}
