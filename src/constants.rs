/// Bit length of the field modulus generated when dealing without a caller-supplied prime.
pub const DEFAULT_PRIME_BITS: u64 = 256;

/// Bit length of the raw samples from which the group element `g` and the discrete-log
/// exponent behind `h` are drawn before reduction modulo the prime.
pub const DEFAULT_SAMPLE_BITS: u64 = 256;

/// Number of OS entropy bytes used to seed each randomness source (256 bits).
pub const SEED_BYTES: usize = 32;

/// Small primes used both for trial division and as Miller-Rabin witnesses.
pub const SMALL_PRIMES: [u32; 40] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173,
];

/// Default directory holding `conf.toml`.
pub const DEFAULT_CONFIG_DIR: &str = ".shard";

/// Prefix of environment variables overriding configuration keys, e.g. `SHARD_PRIME_BITS`.
pub const ENV_PREFIX: &str = "SHARD";
