//! Configuration management for givebox.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "givebox";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "donations.db";

/// Environment variable prefix.
const ENV_PREFIX: &str = "GIVEBOX_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GIVEBOX_`, sections split on `__`,
///    e.g. `GIVEBOX_DONATION__MIN_AMOUNT=100`)
/// 2. TOML config file at `~/.config/givebox/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Donation intake configuration.
    pub donation: DonationConfig,
    /// Payment simulation configuration.
    pub payment: PaymentConfig,
    /// Tax estimate configuration.
    pub tax: TaxConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/givebox/donations.db`
    pub database_path: Option<PathBuf>,
    /// Persist the store to disk. When false every run starts fresh.
    pub persist: bool,
    /// Seed the built-in campaigns into an empty store.
    pub seed_fixtures: bool,
}

/// Donation intake configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonationConfig {
    /// Smallest accepted donation, inclusive.
    pub min_amount: u64,
    /// Largest accepted donation, inclusive.
    pub max_amount: u64,
    /// Cause recorded when no campaign is selected.
    pub default_cause: String,
}

/// Payment simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Fixed delay the simulated processor waits before succeeding.
    pub processing_delay_ms: u64,
}

/// Tax estimate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Share of a donation that is deductible, in percent (80G allows 50).
    pub deduction_percent: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            persist: true,
            seed_fixtures: true,
        }
    }
}

impl Default for DonationConfig {
    fn default() -> Self {
        Self {
            min_amount: 50,
            max_amount: 500_000,
            default_cause: "General Donation".to_string(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 2_000,
        }
    }
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            deduction_percent: 50,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file that must exist.
    ///
    /// Unlike [`Config::load_from`], a missing file is an error rather than
    /// a fall back to defaults. Environment overrides still apply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if `path` is not a file, or the
    /// loading and validation errors of [`Config::load_from`].
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::load_from(Some(path.to_path_buf()))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.donation.min_amount == 0 {
            return Err(Error::ConfigValidation {
                message: "min_amount must be greater than 0".to_string(),
            });
        }

        if self.donation.min_amount > self.donation.max_amount {
            return Err(Error::ConfigValidation {
                message: format!(
                    "min_amount ({}) cannot be greater than max_amount ({})",
                    self.donation.min_amount, self.donation.max_amount
                ),
            });
        }

        if self.donation.default_cause.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "default_cause must not be empty".to_string(),
            });
        }

        if self.tax.deduction_percent > 100 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "deduction_percent ({}) cannot exceed 100",
                    self.tax.deduction_percent
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the simulated payment delay as a Duration.
    #[must_use]
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.payment.processing_delay_ms)
    }
}
