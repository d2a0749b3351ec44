//! Practice configuration
//!
//! One serde struct covering roster generation, tax rates and the store.
//! Every field has a default, so an empty file is a valid configuration.
//!
//! ```toml
//! [dataset]
//! count = 50
//! seed = 7
//! coin = "entropy"
//!
//! [tax]
//! federal_bps = 2400
//! ```

use crate::factory::FactoryConfig;
use crate::metrics::TaxRates;
use crate::store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Full configuration of a practice session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PracticeConfig {
    pub dataset: FactoryConfig,
    pub tax: TaxRates,
    pub store: StoreConfig,
}

impl PracticeConfig {
    /// Parse and validate TOML text
    ///
    /// # Errors
    /// - `Parse` for malformed TOML or unknown keys in any section
    /// - `Invalid` for rates or credits outside their range
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: PracticeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.tax.out_of_range() {
            Some((name, value, _)) if value < 0 => Err(ConfigError::Invalid(format!(
                "tax.{} must not be negative (got {})",
                name, value
            ))),
            Some((name, value, max)) => Err(ConfigError::Invalid(format!(
                "tax.{} must be at most {} (got {})",
                name, max, value
            ))),
            None => Ok(()),
        }
    }
}
