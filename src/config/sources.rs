use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "SWAN_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/swan.toml";
const ENV_PREFIX: &str = "SWAN";
const ENV_SEPARATOR: &str = "__";

const API_KEY_ENV_VAR: &str = "SWAN_API_KEY";
const ACCESS_TOKEN_ENV_VAR: &str = "SWAN_ACCESS_TOKEN";
const JWT_TOKEN_ENV_VAR: &str = "SWAN_JWT_TOKEN";

/// Resolve the configuration file path from `SWAN_CONFIG` or the default
pub fn config_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    load_with_secrets(config_path())
}

/// Same as [`load`] with an explicit file path
pub fn load_with_secrets(config_path: PathBuf) -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config);

    Ok(config)
}

/// Credentials are never read from TOML files, only from the environment
fn load_secrets(config: &mut Config) {
    let non_blank = |name: &str| env::var(name).ok().filter(|value| !value.trim().is_empty());

    if let Some(api_key) = non_blank(API_KEY_ENV_VAR) {
        config.swan.api_key = Some(api_key);
    }
    if let Some(access_token) = non_blank(ACCESS_TOKEN_ENV_VAR) {
        config.swan.access_token = Some(access_token);
    }
    if let Some(jwt_token) = non_blank(JWT_TOKEN_ENV_VAR) {
        config.swan.jwt_token = Some(jwt_token);
    }
}

/// Load configuration from a specific path and environment, without secrets
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // SWAN__SWAN__API_URL -> swan.api_url
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
