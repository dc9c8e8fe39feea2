use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("swan.api_url is required")]
    MissingApiUrl,

    #[error("Invalid api_url scheme in '{url}', expected 'http://' or 'https://'")]
    InvalidApiUrlScheme { url: String },

    #[error("Timeout must be positive: {field}")]
    ZeroTimeout { field: String },

    #[error("deals.default_limit must be positive")]
    InvalidDealLimit,

    #[error("http.user_agent must not be empty")]
    EmptyUserAgent,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_api_url(config)?;
    validate_http(config)?;
    validate_deals(config)?;
    Ok(())
}

fn validate_api_url(config: &Config) -> Result<(), ValidationError> {
    let url = config.swan.api_url.trim();

    if url.is_empty() {
        return Err(ValidationError::MissingApiUrl);
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidApiUrlScheme {
            url: url.to_string(),
        });
    }

    Ok(())
}

fn validate_http(config: &Config) -> Result<(), ValidationError> {
    if config.http.connect_timeout.is_zero() {
        return Err(ValidationError::ZeroTimeout {
            field: "http.connect_timeout".to_string(),
        });
    }

    if config.http.request_timeout.is_zero() {
        return Err(ValidationError::ZeroTimeout {
            field: "http.request_timeout".to_string(),
        });
    }

    if config.http.user_agent.trim().is_empty() {
        return Err(ValidationError::EmptyUserAgent);
    }

    Ok(())
}

fn validate_deals(config: &Config) -> Result<(), ValidationError> {
    if config.deals.default_limit == 0 {
        return Err(ValidationError::InvalidDealLimit);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanize::HumanDuration;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_missing_api_url() {
        let mut config = Config::default();
        config.swan.api_url = "  ".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::MissingApiUrl)));
    }

    #[test]
    fn test_invalid_api_url_scheme() {
        let mut config = Config::default();
        config.swan.api_url = "ftp://swan.example.com".to_string();

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidApiUrlScheme { .. })
        ));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = Config::default();
        config.http.request_timeout = HumanDuration::from_secs(0);

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::ZeroTimeout { .. })));
    }

    #[test]
    fn test_zero_deal_limit() {
        let mut config = Config::default();
        config.deals.default_limit = 0;

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::InvalidDealLimit)));
    }
}
