use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::constants::{DEFAULT_PRIME_BITS, DEFAULT_SAMPLE_BITS, ENV_PREFIX};
use crate::error::{Result, ShardError};

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardConfig {
    /// Bit length of primes generated for new dealings.
    pub prime_bits: u64,
    /// Bit length of the raw draws behind `g` and the exponent of `h`.
    pub sample_bits: u64,
}

impl Default for ShardConfig {
    fn default() -> Self {
        ShardConfig {
            prime_bits: DEFAULT_PRIME_BITS,
            sample_bits: DEFAULT_SAMPLE_BITS,
        }
    }
}

impl ShardConfig {
    /// Loads `conf.toml` from `path`, creating the directory and a default file if they don't
    /// exist, then applies `SHARD_*` environment overrides.
    pub fn new(path: &Path) -> Result<Self> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(|err| ConfigError::Foreign(Box::new(err)))?;
        }

        let conf_file = path.join("conf.toml");
        if !conf_file.exists() {
            let toml = toml::to_string_pretty(&ShardConfig::default())
                .map_err(|err| ConfigError::Foreign(Box::new(err)))?;
            fs::write(&conf_file, toml).map_err(|err| ConfigError::Foreign(Box::new(err)))?;
        }

        debug!("📝 Loaded config at path: {:#?}", conf_file);
        let settings = Self::builder()?
            // Add in `<path>/conf.toml`
            .add_source(config::File::from(conf_file.as_path()))
            // Add in settings from the environment (with a prefix of SHARD)
            // Eg.. `SHARD_PRIME_BITS=512 ./target/shard deal ...` would set the `prime_bits` key
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let my_config: ShardConfig = settings.try_into()?;
        my_config.validate()?;
        Ok(my_config)
    }

    /// Defaults plus `SHARD_*` environment overrides, without touching the filesystem.
    pub fn from_env() -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let my_config: ShardConfig = settings.try_into()?;
        my_config.validate()?;
        Ok(my_config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.prime_bits < 2 {
            return Err(ShardError::InvalidParameters(format!(
                "prime_bits must be at least 2, got {}",
                self.prime_bits
            )));
        }
        if self.sample_bits == 0 {
            return Err(ShardError::InvalidParameters(
                "sample_bits must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn builder() -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("prime_bits", DEFAULT_PRIME_BITS as i64)?
            .set_default("sample_bits", DEFAULT_SAMPLE_BITS as i64)
    }
}

impl TryFrom<Config> for ShardConfig {
    type Error = ConfigError;

    fn try_from(config: Config) -> std::result::Result<Self, Self::Error> {
        Ok(ShardConfig {
            prime_bits: read_bits(&config, "prime_bits")?,
            sample_bits: read_bits(&config, "sample_bits")?,
        })
    }
}

fn read_bits(config: &Config, key: &str) -> std::result::Result<u64, ConfigError> {
    let value = config.get_int(key)?;
    u64::try_from(value).map_err(|_| ConfigError::Message(format!("{key} must not be negative")))
}
