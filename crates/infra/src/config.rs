//! Configuration loading and representation.

use std::path::PathBuf;

use anyhow::{Context, Result};

use invoiceflow_observability::LogFormat;

pub const ENV_DATA_DIR: &str = "INVOICEFLOW_DATA_DIR";
pub const ENV_LOW_STOCK_THRESHOLD: &str = "INVOICEFLOW_LOW_STOCK_THRESHOLD";
pub const ENV_LOG_FORMAT: &str = "INVOICEFLOW_LOG_FORMAT";
pub const ENV_BCRYPT_COST: &str = "INVOICEFLOW_BCRYPT_COST";

pub const DEFAULT_DATA_DIR: &str = ".invoiceflow";
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one `<collection>.json` per collection.
    pub data_dir: PathBuf,
    /// Dashboard counts products with `stock < low_stock_threshold`.
    pub low_stock_threshold: i64,
    pub log_format: LogFormat,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            log_format: LogFormat::default(),
            bcrypt_cost: bcrypt_default_cost(),
        }
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_LOW_STOCK_THRESHOLD) {
            config.low_stock_threshold = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_LOW_STOCK_THRESHOLD} must be an integer, got '{raw}'"))?;
        }
        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.log_format = raw
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {ENV_LOG_FORMAT}"))?;
        }
        if let Some(raw) = lookup(ENV_BCRYPT_COST) {
            let cost: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_BCRYPT_COST} must be an integer, got '{raw}'"))?;
            anyhow::ensure!(
                (4..=31).contains(&cost),
                "{ENV_BCRYPT_COST} must be between 4 and 31, got {cost}"
            );
            config.bcrypt_cost = cost;
        }

        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

fn bcrypt_default_cost() -> u32 {
    invoiceflow_auth::PasswordHasher::default().cost()
}
