//! Proactive share refresh.
//!
//! https://en.wikipedia.org/wiki/Proactive_secret_sharing#Mathematics
//!
//! [`refresh`] produces a sharing of zero together with its commitments. On its own it does not
//! carry the secret: each participant adds its refresh share to the share it already holds
//! ([`apply_refresh`]) and everyone multiplies the commitment sets ([`Commitments::combine`]).
//! [`refresh_shares`] does both steps for a caller holding the whole share set.

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use crate::commitment::{commit, CommitmentGroup, Commitments, GroupParams};
use crate::error::{Result, ShardError};
use crate::field::PrimeField;
use crate::rng::RandomnessSource;
use crate::sss::{check_threshold, evaluate_shares, Polynomial, Share};

/// A zero-sharing evaluated at the participant indices, with its commitments.
#[derive(Debug, Clone)]
pub struct Refreshment {
    pub shares: Vec<Share>,
    pub commitments: Commitments,
}

/// Generates a fresh sharing of zero for participants `1..=n` under `threshold`, committed with
/// the existing group elements.
///
/// The constant term is zero, so the first commitment is `g^0·h^0 = 1` and anyone can check the
/// refresh leaves the secret unchanged.
///
/// # Errors
///
/// [`ShardError::InvalidParameters`] for a bad `(t, n)` pair or group elements outside the
/// commitment group.
pub fn refresh(
    n: usize,
    threshold: usize,
    params: &GroupParams,
    group: &CommitmentGroup,
    rng: &mut impl RandomnessSource,
) -> Result<Refreshment> {
    let field = group.field();
    check_threshold(threshold, n, field)?;
    params.validate(group)?;

    let poly = Polynomial::generate(threshold, BigUint::zero(), field, rng);
    let (binding, commitments) = commit(&poly, params, group, rng);
    let shares = evaluate_shares(&poly, &binding, n, field);

    debug!("🔄 Generated refresh for {} shares with threshold {}", n, threshold);
    Ok(Refreshment {
        shares,
        commitments,
    })
}

/// Adds each participant's refresh share to its prior share, matching on `x`.
///
/// Binding values are summed when both sides carry one; otherwise the refreshed share has none.
///
/// # Errors
///
/// [`ShardError::InvalidParameters`] if some prior share has no refresh share for its `x`.
pub fn apply_refresh(
    prior: &[Share],
    refreshment: &Refreshment,
    field: &PrimeField,
) -> Result<Vec<Share>> {
    prior
        .iter()
        .map(|share| {
            let delta = refreshment
                .shares
                .iter()
                .find(|d| d.x == share.x)
                .ok_or_else(|| {
                    ShardError::InvalidParameters(format!("no refresh share for x = {}", share.x))
                })?;

            let r = match (&share.r, &delta.r) {
                (Some(r), Some(dr)) => Some(field.add(r, dr)),
                _ => None,
            };
            Ok(Share {
                x: share.x.clone(),
                y: field.add(&share.y, &delta.y),
                r,
            })
        })
        .collect()
}

/// Refreshes a whole share set in place and updates the commitments to match.
///
/// After this the shares reconstruct the same secret and verify against `commitments`, but are
/// unrelated to their previous values.
pub fn refresh_shares(
    shares: &mut [Share],
    commitments: &mut Commitments,
    threshold: usize,
    params: &GroupParams,
    group: &CommitmentGroup,
    rng: &mut impl RandomnessSource,
) -> Result<()> {
    if shares.is_empty() {
        return Err(ShardError::InvalidParameters("empty share set".to_string()));
    }
    if commitments.len() != threshold {
        return Err(ShardError::InvalidParameters(format!(
            "expected {} commitments, got {}",
            threshold,
            commitments.len()
        )));
    }
    let n = shares
        .iter()
        .map(|s| s.x.clone())
        .max()
        .and_then(|x| usize::try_from(x).ok())
        .ok_or_else(|| ShardError::InvalidParameters("x-coordinate out of range".to_string()))?;

    let refreshment = refresh(n.max(threshold), threshold, params, group, rng)?;
    let refreshed = apply_refresh(shares, &refreshment, group.field())?;

    *commitments = commitments.combine(&refreshment.commitments, group)?;
    for (share, new) in shares.iter_mut().zip(refreshed) {
        *share = new;
    }
    Ok(())
}
