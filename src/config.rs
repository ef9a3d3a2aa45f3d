//! Configuration loading and validation.
//!
//! Settings are read from a TOML file, with environment variable overrides
//! for the values that normally live outside the repository
//! (`GOOGLE_SHEETS_CREDENTIALS`, `GOOGLE_SHEETS_ID`).
//!
//! # Example
//!
//! ```no_run
//! use sheetquote::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};
use crate::pool::MAX_COLUMNS;

/// Environment variable overriding `sheets.credentials_path`.
pub const ENV_CREDENTIALS: &str = "GOOGLE_SHEETS_CREDENTIALS";
/// Environment variable overriding `sheets.spreadsheet_id`.
pub const ENV_SPREADSHEET_ID: &str = "GOOGLE_SHEETS_ID";

/// Main configuration, aggregating all settings.
///
/// Load from a TOML file with [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Target spreadsheet and credentials.
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Price cache sizing and expiry.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Write-column pool sizing.
    #[serde(default)]
    pub pool: PoolConfig,

    /// Read retry cadence.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Spreadsheet connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Path to the service account key file (JSON).
    #[serde(default)]
    pub credentials_path: String,
    /// Identifier of the target spreadsheet document.
    #[serde(default)]
    pub spreadsheet_id: String,
    /// Worksheet the formula columns live on.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

/// Price cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live applied to every cache write, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum number of cached entries before eviction kicks in.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

/// Column pool settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Number of concurrently usable write columns (1 to 6).
    #[serde(default = "default_pool_columns")]
    pub columns: usize,
}

/// Read retry settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum read attempts per batch.
    #[serde(default = "default_read_attempts")]
    pub read_attempts: u32,
    /// Base backoff unit in milliseconds; attempt `i` sleeps `i` units.
    #[serde(default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,
}

fn default_sheet_name() -> String {
    "price".into()
}

const fn default_ttl_secs() -> u64 {
    300
}

const fn default_cache_capacity() -> usize {
    10_000
}

const fn default_pool_columns() -> usize {
    3
}

const fn default_read_attempts() -> u32 {
    3
}

const fn default_backoff_unit_ms() -> u64 {
    1000
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_path: String::new(),
            spreadsheet_id: String::new(),
            sheet_name: default_sheet_name(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            capacity: default_cache_capacity(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            columns: default_pool_columns(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            read_attempts: default_read_attempts(),
            backoff_unit_ms: default_backoff_unit_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, apply environment overrides,
    /// and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string, apply environment overrides,
    /// and validate.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(ENV_CREDENTIALS) {
            if !path.is_empty() {
                self.sheets.credentials_path = path;
            }
        }
        if let Ok(id) = std::env::var(ENV_SPREADSHEET_ID) {
            if !id.is_empty() {
                self.sheets.spreadsheet_id = id;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.sheets.credentials_path.is_empty() {
            return Err(ConfigError::MissingField {
                field: "credentials_path",
            }
            .into());
        }
        if self.sheets.spreadsheet_id.is_empty() {
            return Err(ConfigError::MissingField {
                field: "spreadsheet_id",
            }
            .into());
        }
        if self.sheets.sheet_name.is_empty() {
            return Err(ConfigError::MissingField { field: "sheet_name" }.into());
        }
        if self.pool.columns == 0 || self.pool.columns > MAX_COLUMNS {
            return Err(ConfigError::InvalidValue {
                field: "pool.columns",
                reason: format!("must be 1..={MAX_COLUMNS}, got {}", self.pool.columns),
            }
            .into());
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.ttl_secs",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.capacity",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.retry.read_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.read_attempts",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
