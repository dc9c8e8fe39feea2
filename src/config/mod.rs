//! Configuration management for the Swan client
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use swan_client::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Swan API: {}", config.swan.api_url);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `SWAN__<section>__<key>`
//!
//! Examples:
//! - `SWAN__SWAN__API_URL=https://go-swan-server.filswan.com`
//! - `SWAN__HTTP__REQUEST_TIMEOUT=2m`
//! - `SWAN__DEALS__DEFAULT_LIMIT=100`
//!
//! Credentials are only taken from `SWAN_API_KEY`, `SWAN_ACCESS_TOKEN` and
//! `SWAN_JWT_TOKEN`.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/swan.toml`.
//! This can be overridden using the `SWAN_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::HumanDuration;
pub use models::{Config, DealsConfig, HttpConfig, SwanConfig, TelemetryConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`SWAN__*`, plus the credential variables)
    /// 2. TOML file (default: `config/swan.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path, including credentials from the environment
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_with_secrets(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Path [`Config::load`] reads from
    pub fn default_path() -> std::path::PathBuf {
        sources::config_path()
    }
}
