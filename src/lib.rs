//! # Verifiable Shamir Secret Sharing with Proactive Share Refresh
//!
//! This library splits a secret integer among `n` custodians so that any `t` of them can rebuild
//! it while fewer learn nothing, lets every custodian check its share against public Pedersen
//! commitments, and re-randomizes shares without changing the secret.
//!
//! ## Shamir's Secret Sharing (SSS)
//!
//! Given a secret `S` below a prime `p`, the dealer chooses a random polynomial of degree `t-1`
//! over `Z/pZ`:
//!
//! ```ignore
//! f(x) = a0 + a1*x + a2*x^2 + ... + a(t-1)*x^(t-1)
//! ```
//!
//! where `a0 = S`. Participant `i` receives `(i, f(i))`. With `t` points the secret is recovered
//! by Lagrange interpolation at zero.
//!
//! ### Pedersen commitments
//!
//! Alongside `f` the dealer draws a binding polynomial `b` and publishes
//! `C_i = g^{a_i} * h^{b_i}` for every coefficient. Participant `i` also receives `b(i)` and
//! checks `g^{f(i)} * h^{b(i)} == Π C_j^{i^j}` using public data only. The group elements live
//! in the order-`p` subgroup of `Z_q*` for the first prime `q = k*p + 1`.
//!
//! ### Proactive Secret Sharing
//!
//! A refresh deals a sharing of zero. Each participant adds its refresh share to the one it
//! holds, and the commitment sets are multiplied, so the secret and verifiability survive while
//! old shares become useless.
//!
//! ### Example: Splitting and combining a secret
//!
//! ```rust
//! use num_bigint::BigUint;
//! use vshard::field::PrimeField;
//! use vshard::rng::Randomness;
//! use vshard::sss::{deal, reconstruct};
//!
//! let field = PrimeField::new(BigUint::from(2089u32))?;
//! let mut rng = Randomness::from_os_entropy()?;
//!
//! let dealing = deal(&BigUint::from(42u32), 5, 3, &field, 256, &mut rng)?;
//! let secret = reconstruct(&dealing.shares[2..], 3, &field)?;
//! assert_eq!(secret, BigUint::from(42u32));
//! # Ok::<(), vshard::ShardError>(())
//! ```
//!
//! ## Modules
//!
//! - `rng`: injectable randomness, OS-seeded or fixed-seed.
//! - `field`: modular arithmetic over the prime field.
//! - `prime`: probable-prime generation.
//! - `sss`: polynomials, shares, dealing and reconstruction.
//! - `commitment`: Pedersen commitments and share verification.
//! - `refresh`: proactive refresh.
//! - `engine`: the deal / reconstruct / refresh / verify entry points used by the CLI.

/// Base-10 parsing and serde helpers for big integers crossing the crate boundary.
pub mod decimal;

/// The `commitment` module derives the commitment group, samples `g` and `h`, commits to
/// polynomials and verifies shares against the published commitments.
pub mod commitment;

/// Settings loaded from `conf.toml` and `SHARD_*` environment variables.
pub mod config;

/// The `constants` module defines various constants used in the library.
pub mod constants;

/// Entry points operating on plain integers, each seeding its own randomness.
pub mod engine;

/// The crate-wide `ShardError` type and `Result` alias.
pub mod error;

/// Arithmetic modulo a prime.
pub mod field;

/// Probable-prime testing and generation of primes of a given bit length.
pub mod prime;

/// The `refresh` module re-randomizes shares with sharings of zero.
pub mod refresh;

/// Randomness sources: OS-seeded for real use, fixed-seed for tests.
pub mod rng;

/// The `sss` (Shamir's Secret Sharing) module is the core of the library. It builds and
/// evaluates polynomials over the prime field, deals shares together with their commitments and
/// reconstructs the secret by Lagrange interpolation.
pub mod sss;

pub use error::{Result, ShardError};
