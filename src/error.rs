use num_bigint::BigUint;

/// Errors raised by the sharing engine.
///
/// A share failing commitment verification is not an error; see
/// [`Verification`](crate::commitment::Verification).
#[derive(Debug, thiserror::Error)]
pub enum ShardError {
    /// The OS entropy source could not seed a generator. Nothing may proceed without it.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(#[source] rand::Error),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A modular inverse was requested for a value sharing a factor with the modulus,
    /// typically a duplicate or zero x-coordinate among the supplied shares.
    #[error("{value} is not invertible modulo {modulus}")]
    NotInvertible { value: BigUint, modulus: BigUint },

    #[error("share {x} carries no binding value and cannot be verified")]
    MissingBinding { x: BigUint },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ShardError>;
