//! TOML configuration loading and validation.

use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;

use safebook::safe_math;

use crate::error::{Error, Result};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "preview.toml";

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fees: FeesConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeesConfig {
    /// Flat fee per token, in quote currency.
    #[serde(default = "default_fee")]
    pub fee_per_token: String,
}

fn default_fee() -> String {
    "0".into()
}

impl Default for FeesConfig {
    fn default() -> Self {
        Self {
            fee_per_token: default_fee(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places shown in tables.
    #[serde(default = "default_places")]
    pub places: usize,
}

fn default_places() -> usize {
    4
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            places: default_places(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicitly requested file, or fall back to built-in defaults
    /// when the default file does not exist.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        let fee = &self.fees.fee_per_token;
        match safe_math::less_than(fee, "0") {
            Ok(false) => {}
            Ok(true) => {
                return Err(Error::Config(format!(
                    "fee_per_token must be >= 0, got {fee}"
                )));
            }
            Err(e) => return Err(Error::Config(format!("fee_per_token: {e}"))),
        }
        if self.display.places > safe_math::MAX_PRECISION {
            return Err(Error::Config(format!(
                "places must be <= {}",
                safe_math::MAX_PRECISION
            )));
        }
        self.log_level()?;
        Ok(())
    }

    /// Configured log filter.
    pub fn log_level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.logging.level).map_err(|_| {
            Error::Config(format!("unknown log level '{}'", self.logging.level))
        })
    }
}
