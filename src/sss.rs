use core::fmt;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::commitment::{commit, CommitmentGroup, Commitments, GroupParams};
use crate::error::{Result, ShardError};
use crate::field::PrimeField;
use crate::rng::RandomnessSource;

/// Represents a polynomial over the prime field `Z/pZ`.
///
/// Coefficients are stored lowest degree first. A polynomial lives only as long as the operation
/// that created it; its coefficients are never serialized and never printed, so `Debug` only
/// reveals the degree.
#[derive(Clone, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<BigUint>,
}

impl Polynomial {
    /// Constructs a polynomial with `threshold` coefficients (degree `threshold - 1`) whose
    /// constant term is `constant_term` and whose remaining coefficients are uniform in `[0, p)`.
    ///
    /// # Arguments
    ///
    /// * `threshold` - The number of coefficients.
    /// * `constant_term` - The secret for a sharing polynomial, zero for binding and refresh
    ///   polynomials.
    /// * `field` - The field the coefficients live in.
    /// * `rng` - Source of the random coefficients.
    pub fn generate(
        threshold: usize,
        constant_term: BigUint,
        field: &PrimeField,
        rng: &mut impl RandomnessSource,
    ) -> Self {
        let mut coefficients = Vec::with_capacity(threshold);
        if threshold > 0 {
            coefficients.push(constant_term);
        }
        for _ in 1..threshold {
            coefficients.push(rng.sample_uniform(field.modulus()));
        }
        Polynomial { coefficients }
    }

    /// Builds a polynomial from explicit coefficients, lowest degree first.
    pub fn from_coefficients(coefficients: Vec<BigUint>) -> Self {
        Polynomial { coefficients }
    }

    /// Evaluates the polynomial at `x`.
    ///
    /// Keeps a running power of `x`, reduced after every step, instead of recomputing `x^i` for
    /// each term. Pure: identical inputs always give identical outputs.
    pub fn evaluate(&self, x: &BigUint, field: &PrimeField) -> BigUint {
        let mut result = BigUint::zero();
        let mut x_pow = field.one();

        for coeff in &self.coefficients {
            result = field.add(&result, &field.mul(coeff, &x_pow));
            x_pow = field.mul(&x_pow, x);
        }

        result
    }

    pub fn coefficients(&self) -> &[BigUint] {
        &self.coefficients
    }

    /// Number of coefficients, i.e. the threshold the polynomial was generated for.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polynomial")
            .field("degree", &self.coefficients.len().saturating_sub(1))
            .finish_non_exhaustive()
    }
}

/// One participant's share: the point `(x, y)` on the secret polynomial plus the binding value
/// `r` used to check it against the public commitments.
///
/// `r` is absent when only `(x, y)` is known, e.g. for shares typed in for reconstruction.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    #[serde(with = "crate::decimal")]
    pub x: BigUint,
    #[serde(with = "crate::decimal")]
    pub y: BigUint,
    #[serde(
        with = "crate::decimal::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub r: Option<BigUint>,
}

impl Share {
    pub fn new(x: BigUint, y: BigUint, r: BigUint) -> Self {
        Share { x, y, r: Some(r) }
    }

    /// A share carrying only its point, without a binding value.
    pub fn point(x: BigUint, y: BigUint) -> Self {
        Share { x, y, r: None }
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("x", &self.x)
            .field("has_binding", &self.r.is_some())
            .finish_non_exhaustive()
    }
}

/// Prints the public `(x, y)` pair.
impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Everything a dealing produces: fresh group elements, one share per participant and the
/// public commitment set.
#[derive(Debug, Clone)]
pub struct Dealing {
    pub params: GroupParams,
    pub shares: Vec<Share>,
    pub commitments: Commitments,
}

/// Checks the `(t, n)` preconditions shared by dealing and refreshing.
///
/// # Errors
///
/// Returns [`ShardError::InvalidParameters`] if `threshold < 1`, `n < threshold`, or `n` is not
/// below the modulus (the x-coordinates `1..=n` must be distinct and nonzero modulo `p`).
pub fn check_threshold(threshold: usize, n: usize, field: &PrimeField) -> Result<()> {
    if threshold < 1 {
        return Err(ShardError::InvalidParameters(
            "threshold must be at least 1".to_string(),
        ));
    }
    if n < threshold {
        return Err(ShardError::InvalidParameters(format!(
            "share count {n} is below threshold {threshold}"
        )));
    }
    if !field.contains(&BigUint::from(n)) {
        return Err(ShardError::InvalidParameters(format!(
            "share count {n} does not fit below the modulus"
        )));
    }
    Ok(())
}

/// Splits `secret` into `n` verifiable shares, any `threshold` of which recover it.
///
/// Samples fresh group elements, builds the secret polynomial and its binding polynomial, commits
/// to both and evaluates them at `x = 1..=n`. Every returned share verifies against the returned
/// commitments.
///
/// # Errors
///
/// [`ShardError::InvalidParameters`] for a bad `(t, n)` pair or a secret that is not below the
/// modulus. Nothing is generated in that case.
pub fn deal(
    secret: &BigUint,
    n: usize,
    threshold: usize,
    field: &PrimeField,
    sample_bits: u64,
    rng: &mut impl RandomnessSource,
) -> Result<Dealing> {
    check_threshold(threshold, n, field)?;
    if !field.contains(secret) {
        return Err(ShardError::InvalidParameters(
            "secret must be strictly less than the modulus".to_string(),
        ));
    }

    let group = CommitmentGroup::for_field(field)?;
    let params = GroupParams::generate(&group, sample_bits, rng);

    let poly = Polynomial::generate(threshold, secret.clone(), field, rng);
    let (binding, commitments) = commit(&poly, &params, &group, rng);

    let shares = evaluate_shares(&poly, &binding, n, field);
    debug!(
        "✂️ Dealt {} shares with threshold {} and {} commitments",
        shares.len(),
        threshold,
        commitments.len()
    );

    Ok(Dealing {
        params,
        shares,
        commitments,
    })
}

/// Evaluates `poly` and `binding` at every participant index `1..=n`.
pub(crate) fn evaluate_shares(
    poly: &Polynomial,
    binding: &Polynomial,
    n: usize,
    field: &PrimeField,
) -> Vec<Share> {
    (1..=n)
        .map(|i| {
            let x = BigUint::from(i);
            let y = poly.evaluate(&x, field);
            let r = binding.evaluate(&x, field);
            Share::new(x, y, r)
        })
        .collect()
}

/// Recovers the secret from `threshold` shares by Lagrange interpolation at zero.
///
/// Any `threshold` honestly dealt shares give the same result. Extra shares beyond the threshold
/// are ignored. Fewer shares are interpolated as given and produce an unrelated value, so callers
/// must reject short share sets before calling.
///
/// # Errors
///
/// * [`ShardError::InvalidParameters`] if `threshold` is zero.
/// * [`ShardError::NotInvertible`] if two shares have the same x-coordinate, or one is zero,
///   modulo `p`.
pub fn reconstruct(shares: &[Share], threshold: usize, field: &PrimeField) -> Result<BigUint> {
    if threshold < 1 {
        return Err(ShardError::InvalidParameters(
            "threshold must be at least 1".to_string(),
        ));
    }
    if shares.len() < threshold {
        warn!(
            "Reconstructing from {} shares, below threshold {}; the result will not be the secret",
            shares.len(),
            threshold
        );
    }

    let used = &shares[..threshold.min(shares.len())];
    let secret = interpolate_at_zero(used, field)?;
    debug!("🔑 Reconstructed secret from {} shares", used.len());
    Ok(secret)
}

/// Performs Lagrange interpolation at `x = 0`:
/// `Σ y_i · Π_{j≠i} x_j / (x_j − x_i)`.
fn interpolate_at_zero(shares: &[Share], field: &PrimeField) -> Result<BigUint> {
    if let Some(share) = shares.iter().find(|s| field.reduce(&s.x).is_zero()) {
        return Err(ShardError::NotInvertible {
            value: share.x.clone(),
            modulus: field.modulus().clone(),
        });
    }

    let mut value = BigUint::zero();

    for (i, a) in shares.iter().enumerate() {
        let mut num = BigUint::one();
        let mut den = BigUint::one();

        for (j, b) in shares.iter().enumerate() {
            if i != j {
                num = field.mul(&num, &b.x);
                den = field.mul(&den, &field.sub(&b.x, &a.x));
            }
        }

        let weight = field.mul(&num, &field.inverse(&den)?);
        value = field.add(&value, &field.mul(&a.y, &weight));
    }

    Ok(value)
}
