use crate::humanize::HumanDuration;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub swan: SwanConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub deals: DealsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Platform endpoint and credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SwanConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// API key (loaded from environment, not from config file)
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Access token paired with the API key (loaded from environment)
    #[serde(skip)]
    pub access_token: Option<String>,
    /// Pre-issued bearer token; when set, no token exchange happens
    #[serde(skip)]
    pub jwt_token: Option<String>,
}

impl Default for SwanConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            access_token: None,
            jwt_token: None,
        }
    }
}

fn default_api_url() -> String {
    "https://go-swan-server.filswan.com".to_string()
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: HumanDuration,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: HumanDuration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_connect_timeout() -> HumanDuration {
    HumanDuration::from_secs(10)
}

fn default_request_timeout() -> HumanDuration {
    HumanDuration::from_secs(60)
}

fn default_user_agent() -> String {
    concat!("swan-client/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Offline deal listing settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DealsConfig {
    #[serde(default = "default_deal_limit")]
    pub default_limit: usize,
}

impl Default for DealsConfig {
    fn default() -> Self {
        Self {
            default_limit: default_deal_limit(),
        }
    }
}

fn default_deal_limit() -> usize {
    50
}

/// Logging configuration for the binary
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
