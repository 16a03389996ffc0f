use num_bigint::BigUint;
use serde::Serialize;
use tracing::info;

use crate::commitment::{verify, CommitmentGroup, Commitments, GroupParams, Verification};
use crate::config::ShardConfig;
use crate::error::{Result, ShardError};
use crate::field::PrimeField;
use crate::prime::{generate_prime, is_probable_prime};
use crate::refresh::refresh;
use crate::rng::Randomness;
use crate::sss::{deal, reconstruct, Share};

/// Result of a dealing as handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct DealReport {
    #[serde(with = "crate::decimal")]
    pub prime: BigUint,
    #[serde(with = "crate::decimal")]
    pub group_modulus: BigUint,
    pub params: GroupParams,
    pub shares: Vec<Share>,
    pub commitments: Commitments,
}

/// Result of a refresh: the zero-sharing each participant adds to its current share.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    #[serde(with = "crate::decimal")]
    pub prime: BigUint,
    pub shares: Vec<Share>,
    pub commitments: Commitments,
}

/// Entry points used by the command line and other callers holding plain integers.
///
/// Every call that needs randomness seeds its own generator from OS entropy, so independent
/// calls share no mutable state and may run on separate threads.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: ShardConfig,
}

impl Engine {
    pub fn new(config: ShardConfig) -> Self {
        Engine { config }
    }

    /// Generates a `prime_bits` prime and deals `secret` into `n` shares with threshold
    /// `threshold`.
    ///
    /// The secret must be shorter than `prime_bits` so that it lies below every candidate prime.
    pub fn deal(&self, secret: &BigUint, threshold: usize, n: usize) -> Result<DealReport> {
        if threshold < 1 || n < threshold {
            return Err(ShardError::InvalidParameters(format!(
                "need 1 <= threshold <= n, got threshold {threshold} and n {n}"
            )));
        }
        if secret.bits() >= self.config.prime_bits {
            return Err(ShardError::InvalidParameters(format!(
                "secret has {} bits, the prime only {}",
                secret.bits(),
                self.config.prime_bits
            )));
        }

        let mut rng = Randomness::from_os_entropy()?;
        let prime = generate_prime(self.config.prime_bits, &mut rng)?;
        self.deal_with(secret, threshold, n, prime, &mut rng)
    }

    /// Deals under a caller-supplied prime.
    pub fn deal_with_prime(
        &self,
        secret: &BigUint,
        threshold: usize,
        n: usize,
        prime: &BigUint,
    ) -> Result<DealReport> {
        let mut rng = Randomness::from_os_entropy()?;
        self.deal_with(secret, threshold, n, prime.clone(), &mut rng)
    }

    fn deal_with(
        &self,
        secret: &BigUint,
        threshold: usize,
        n: usize,
        prime: BigUint,
        rng: &mut Randomness,
    ) -> Result<DealReport> {
        let field = prime_field(prime)?;
        let dealing = deal(secret, n, threshold, &field, self.config.sample_bits, rng)?;
        let group = CommitmentGroup::for_field(&field)?;

        info!("✂️ Secret has been split into {} shares (threshold {})", n, threshold);
        Ok(DealReport {
            prime: field.modulus().clone(),
            group_modulus: group.modulus().clone(),
            params: dealing.params,
            shares: dealing.shares,
            commitments: dealing.commitments,
        })
    }

    /// Recovers the secret from `points`; the threshold is the number of points given.
    pub fn reconstruct(&self, prime: &BigUint, points: &[Share]) -> Result<BigUint> {
        if points.is_empty() {
            return Err(ShardError::InvalidParameters(
                "at least one share is required".to_string(),
            ));
        }
        let field = prime_field(prime.clone())?;
        reconstruct(points, points.len(), &field)
    }

    /// Generates refresh shares for participants `1..=n` under existing group elements.
    pub fn refresh(
        &self,
        prime: &BigUint,
        threshold: usize,
        n: usize,
        params: &GroupParams,
    ) -> Result<RefreshReport> {
        let field = prime_field(prime.clone())?;
        let group = CommitmentGroup::for_field(&field)?;
        let mut rng = Randomness::from_os_entropy()?;

        let refreshment = refresh(n, threshold, params, &group, &mut rng)?;
        info!("🔄 Generated {} refresh shares", refreshment.shares.len());
        Ok(RefreshReport {
            prime: prime.clone(),
            shares: refreshment.shares,
            commitments: refreshment.commitments,
        })
    }

    /// Checks one share against public commitments.
    pub fn verify(
        &self,
        prime: &BigUint,
        params: &GroupParams,
        commitments: &Commitments,
        share: &Share,
    ) -> Result<Verification> {
        let field = prime_field(prime.clone())?;
        let group = CommitmentGroup::for_field(&field)?;
        verify(share, commitments, params, &group)
    }
}

fn prime_field(prime: BigUint) -> Result<PrimeField> {
    if !is_probable_prime(&prime) {
        return Err(ShardError::InvalidParameters(format!("{prime} is not prime")));
    }
    PrimeField::new(prime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_engine() -> Engine {
        Engine::new(ShardConfig {
            prime_bits: 64,
            sample_bits: 128,
        })
    }

    #[test]
    fn test_deal_then_reconstruct() -> Result<()> {
        let engine = small_engine();
        let secret = BigUint::from(123456789u64);

        let report = engine.deal(&secret, 3, 5)?;
        assert!(report.prime > secret);
        assert_eq!(report.shares.len(), 5);

        let points: Vec<Share> = report.shares[1..4]
            .iter()
            .map(|s| Share::point(s.x.clone(), s.y.clone()))
            .collect();
        assert_eq!(engine.reconstruct(&report.prime, &points)?, secret);
        Ok(())
    }

    #[test]
    fn test_deal_shares_verify() -> Result<()> {
        let engine = small_engine();
        let report = engine.deal(&BigUint::from(7u32), 2, 3)?;

        for share in &report.shares {
            let outcome =
                engine.verify(&report.prime, &report.params, &report.commitments, share)?;
            assert!(outcome.is_valid());
        }
        Ok(())
    }

    #[test]
    fn test_deal_with_prime() -> Result<()> {
        let engine = Engine::default();
        let prime = BigUint::from(2089u32);

        let report = engine.deal_with_prime(&BigUint::from(42u32), 3, 5, &prime)?;
        assert_eq!(report.prime, prime);
        assert_eq!(engine.reconstruct(&prime, &report.shares[..3])?, BigUint::from(42u32));

        assert!(engine
            .deal_with_prime(&BigUint::from(42u32), 3, 5, &BigUint::from(2088u32))
            .is_err());
        Ok(())
    }

    #[test]
    fn test_refresh_round() -> Result<()> {
        let engine = small_engine();
        let secret = BigUint::from(99u32);
        let report = engine.deal(&secret, 2, 4)?;

        let update = engine.refresh(&report.prime, 2, 4, &report.params)?;
        assert_eq!(update.shares.len(), 4);

        let field = PrimeField::new(report.prime.clone())?;
        let refreshed: Vec<Share> = report
            .shares
            .iter()
            .zip(&update.shares)
            .map(|(old, delta)| Share::point(old.x.clone(), field.add(&old.y, &delta.y)))
            .collect();
        assert_eq!(engine.reconstruct(&report.prime, &refreshed[2..])?, secret);
        Ok(())
    }

    #[test]
    fn test_invalid_parameters_rejected_early() {
        let engine = small_engine();
        let secret = BigUint::from(1u32);

        assert!(matches!(
            engine.deal(&secret, 0, 3),
            Err(ShardError::InvalidParameters(_))
        ));
        assert!(matches!(
            engine.deal(&secret, 4, 3),
            Err(ShardError::InvalidParameters(_))
        ));
        let huge = BigUint::from(1u32) << 80usize;
        assert!(matches!(
            engine.deal(&huge, 2, 3),
            Err(ShardError::InvalidParameters(_))
        ));
        assert!(engine.reconstruct(&BigUint::from(2089u32), &[]).is_err());
    }

    #[test]
    fn test_secret_as_long_as_prime_rejected_before_dealing() {
        let engine = Engine::new(ShardConfig {
            prime_bits: 16,
            sample_bits: 128,
        });

        for _ in 0..20 {
            assert!(matches!(
                engine.deal(&BigUint::from(65000u32), 2, 3),
                Err(ShardError::InvalidParameters(_))
            ));
        }

        let widest = BigUint::from((1u32 << 15) - 1);
        for _ in 0..20 {
            let report = engine.deal(&widest, 2, 3).unwrap();
            assert_eq!(engine.reconstruct(&report.prime, &report.shares[1..]).unwrap(), widest);
        }
    }

    #[test]
    fn test_narrow_sample_bits_deal_verifies() -> Result<()> {
        let engine = Engine::new(ShardConfig {
            prime_bits: 16,
            sample_bits: 1,
        });
        let prime = BigUint::from(2089u32);

        let report = engine.deal_with_prime(&BigUint::from(5u32), 2, 3, &prime)?;
        for share in &report.shares {
            assert!(engine
                .verify(&prime, &report.params, &report.commitments, share)?
                .is_valid());
        }
        Ok(())
    }

    #[test]
    fn test_composite_modulus_rejected() {
        let engine = Engine::default();
        let composite = BigUint::from(2088u32);
        let points = vec![
            Share::point(BigUint::from(1u32), BigUint::from(5u32)),
            Share::point(BigUint::from(2u32), BigUint::from(9u32)),
        ];
        let share = Share::new(BigUint::from(1u32), BigUint::from(5u32), BigUint::from(3u32));
        let params = GroupParams {
            g: BigUint::from(4u32),
            h: BigUint::from(16u32),
        };
        let commitments = Commitments::new(vec![BigUint::from(4u32)]);

        assert!(matches!(
            engine.reconstruct(&composite, &points),
            Err(ShardError::InvalidParameters(_))
        ));
        assert!(matches!(
            engine.verify(&composite, &params, &commitments, &share),
            Err(ShardError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_report_serializes_as_decimal() -> Result<()> {
        let engine = Engine::default();
        let report =
            engine.deal_with_prime(&BigUint::from(5u32), 1, 1, &BigUint::from(2089u32))?;

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["prime"], "2089");
        assert_eq!(json["shares"][0]["y"], "5");
        assert!(json["commitments"][0].is_string());
        Ok(())
    }
}
