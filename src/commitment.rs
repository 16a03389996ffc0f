//! Pedersen commitments to sharing polynomials.
//!
//! The commitments live in the subgroup of order `p` of `Z_q*`, where `p` is the share field
//! modulus and `q = k·p + 1` is the first prime of that form. Exponents are then field elements
//! and `g^{f(x)}·h^{b(x)} = Π C_i^{x^i}` holds exactly for honestly dealt shares.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ShardError};
use crate::field::PrimeField;
use crate::prime::is_probable_prime;
use crate::rng::RandomnessSource;
use crate::sss::{Polynomial, Share};

/// The prime-order group commitments are computed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitmentGroup {
    field: PrimeField,
    modulus: PrimeField,
    cofactor: BigUint,
}

impl CommitmentGroup {
    /// Derives the group for a share field: the smallest `k ≥ 1` with `q = k·p + 1` prime.
    ///
    /// Deterministic, so every holder of `p` arrives at the same `q`.
    pub fn for_field(field: &PrimeField) -> Result<Self> {
        let mut cofactor = BigUint::one();
        let modulus = loop {
            let candidate = field.modulus() * &cofactor + 1u32;
            if is_probable_prime(&candidate) {
                break candidate;
            }
            cofactor += 1u32;
        };
        debug!(
            "🧮 Commitment group modulus has {} bits (cofactor {})",
            modulus.bits(),
            cofactor
        );

        Ok(CommitmentGroup {
            field: field.clone(),
            modulus: PrimeField::new(modulus)?,
            cofactor,
        })
    }

    /// The share field; also the exponent field of the group.
    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// The prime `q` group elements are reduced by.
    pub fn modulus(&self) -> &BigUint {
        self.modulus.modulus()
    }

    pub fn cofactor(&self) -> &BigUint {
        &self.cofactor
    }

    /// Whether `e` is a non-identity element of the order-`p` subgroup.
    pub fn contains(&self, e: &BigUint) -> bool {
        !e.is_zero()
            && !e.is_one()
            && self.modulus.contains(e)
            && self.modulus.pow(e, self.field.modulus()).is_one()
    }

    fn pow(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        self.modulus.pow(base, exponent)
    }

    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        self.modulus.mul(a, b)
    }
}

/// The public group elements `g` and `h = g^a` for a discarded exponent `a`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupParams {
    #[serde(with = "crate::decimal")]
    pub g: BigUint,
    #[serde(with = "crate::decimal")]
    pub h: BigUint,
}

impl GroupParams {
    /// Samples fresh group elements.
    ///
    /// `g` is a draw reduced modulo `q` and raised to the cofactor, redrawn until it is not the
    /// identity. The exponent `a` is a draw reduced modulo `p`, redrawn while zero; it is dropped
    /// once `h` is computed. Draws take `sample_bits` bits, widened to the bit length of the
    /// modulus they are reduced by so that every residue can come up.
    pub fn generate(
        group: &CommitmentGroup,
        sample_bits: u64,
        rng: &mut impl RandomnessSource,
    ) -> Self {
        let g = loop {
            let u = reduced_draw(rng, sample_bits, group.modulus());
            let g = group.pow(&u, group.cofactor());
            if group.contains(&g) {
                break g;
            }
        };

        let h = {
            let a = loop {
                let a = reduced_draw(rng, sample_bits, group.field().modulus());
                if !a.is_zero() {
                    break a;
                }
            };
            group.pow(&g, &a)
        };

        GroupParams { g, h }
    }

    /// Checks caller-supplied elements belong to the commitment group.
    pub fn validate(&self, group: &CommitmentGroup) -> Result<()> {
        if !group.contains(&self.g) || !group.contains(&self.h) {
            return Err(ShardError::InvalidParameters(
                "g and h must be non-identity elements of the commitment group".to_string(),
            ));
        }
        Ok(())
    }
}

fn reduced_draw(
    rng: &mut impl RandomnessSource,
    sample_bits: u64,
    modulus: &BigUint,
) -> BigUint {
    rng.sample_bits(sample_bits.max(modulus.bits())) % modulus
}

/// Public commitments `C_i = g^{a_i}·h^{b_i} mod q`, index-aligned with the committed
/// polynomial's coefficients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitments(#[serde(with = "crate::decimal::vec")] Vec<BigUint>);

impl Commitments {
    pub fn new(values: Vec<BigUint>) -> Self {
        Commitments(values)
    }

    pub fn as_slice(&self) -> &[BigUint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coefficient-wise product, the commitment to the sum of the two committed polynomials.
    pub fn combine(&self, other: &Commitments, group: &CommitmentGroup) -> Result<Commitments> {
        if self.len() != other.len() {
            return Err(ShardError::InvalidParameters(format!(
                "cannot combine {} commitments with {}",
                self.len(),
                other.len()
            )));
        }
        Ok(Commitments(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| group.mul(a, b))
                .collect(),
        ))
    }
}

/// Outcome of checking a share against a commitment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verification {
    Valid,
    Invalid,
}

impl Verification {
    pub fn is_valid(self) -> bool {
        self == Verification::Valid
    }
}

/// Commits to `poly` under fresh blinding.
///
/// Draws a binding polynomial of the same length with a zero constant term and returns it with
/// the commitments `C_i = g^{a_i}·h^{b_i}`.
pub fn commit(
    poly: &Polynomial,
    params: &GroupParams,
    group: &CommitmentGroup,
    rng: &mut impl RandomnessSource,
) -> (Polynomial, Commitments) {
    let binding = Polynomial::generate(poly.len(), BigUint::zero(), group.field(), rng);

    let commitments = poly
        .coefficients()
        .iter()
        .zip(binding.coefficients())
        .map(|(a, b)| group.mul(&group.pow(&params.g, a), &group.pow(&params.h, b)))
        .collect();

    (binding, Commitments(commitments))
}

/// Checks `g^y·h^r == Π C_i^{x^i}`.
///
/// Needs only the share and public data. A mismatch is reported as [`Verification::Invalid`],
/// not as an error.
///
/// # Errors
///
/// [`ShardError::MissingBinding`] if the share has no binding value.
pub fn verify(
    share: &Share,
    commitments: &Commitments,
    params: &GroupParams,
    group: &CommitmentGroup,
) -> Result<Verification> {
    let r = share.r.as_ref().ok_or_else(|| ShardError::MissingBinding {
        x: share.x.clone(),
    })?;
    let field = group.field();

    let lhs = group.mul(&group.pow(&params.g, &share.y), &group.pow(&params.h, r));

    let mut rhs = BigUint::one();
    let mut x_pow = field.one();
    for c in commitments.as_slice() {
        rhs = group.mul(&rhs, &group.pow(c, &x_pow));
        x_pow = field.mul(&x_pow, &share.x);
    }

    Ok(if lhs == rhs {
        Verification::Valid
    } else {
        Verification::Invalid
    })
}

/// Verifies every share, returning outcomes in input order.
pub fn verify_all(
    shares: &[Share],
    commitments: &Commitments,
    params: &GroupParams,
    group: &CommitmentGroup,
) -> Result<Vec<Verification>> {
    shares
        .iter()
        .map(|share| {
            let outcome = verify(share, commitments, params, group)?;
            debug!("🔍 Share {} is {:?}", share.x, outcome);
            Ok(outcome)
        })
        .collect()
}
