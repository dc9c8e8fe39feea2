//! Exchange of an API key and access token for a bearer token
//!
//! [`Authenticator`] asks the platform for a JWT at most
//! [`MAX_TOKEN_ATTEMPTS`] times, back to back, and installs the first token it
//! gets into the target [`SwanClient`]. A client is never left holding an
//! empty token.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::client::{STATUS_SUCCESS, SwanClient, require};
use crate::error::{Result, SwanError};
use crate::observability::ClientEvent;
use crate::transport::{RequestBody, TransportRequest};

pub const TOKEN_ENDPOINT: &str = "/user/api_keys/jwt";
pub const MAX_TOKEN_ATTEMPTS: u32 = 3;

/// Marker the platform puts in every rejected token request
const FAILURE_MARKER: &str = "fail";

const API_KEY_NOT_FOUND: &str = "api_key Not found";
const INVALID_API_TOKEN: &str = "please provide a valid api token";

const CONFIG_DOCS_HINT: &str = "for more information about how to config, please check https://docs.filswan.com/run-swan-provider/config-swan-provider";

/// API key and access token pair
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    access_token: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            access_token: access_token.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        require(&self.api_key, "api key")?;
        require(&self.access_token, "access token")?;
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    apikey: &'a str,
    access_token: &'a str,
}

#[derive(Debug)]
pub struct Authenticator {
    credentials: Credentials,
    max_attempts: u32,
}

impl Authenticator {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            max_attempts: MAX_TOKEN_ATTEMPTS,
        }
    }

    /// Obtain a token and install it into `client`.
    ///
    /// Attempts are immediate, with no delay in between. After the last one
    /// fails the result is [`SwanError::AuthExhausted`] wrapping that
    /// attempt's error.
    pub async fn authenticate(&self, client: &mut SwanClient) -> Result<()> {
        self.credentials.validate()?;
        require(client.api_url(), "api url")?;

        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.request_token(client).await {
                Ok(token) => {
                    client.set_token(token);
                    client
                        .observer()
                        .record(&ClientEvent::TokenAcquired { attempts: attempt });
                    return Ok(());
                }
                Err(error) => {
                    client
                        .observer()
                        .record(&ClientEvent::AuthAttemptFailed { attempt, error: &error });
                    last_error = Some(error);
                }
            }
        }

        let source = last_error
            .unwrap_or_else(|| SwanError::validation("token attempts must be positive"));
        Err(SwanError::AuthExhausted {
            attempts: self.max_attempts,
            source: Box::new(source),
        })
    }

    async fn request_token(&self, client: &SwanClient) -> Result<String> {
        let body = RequestBody::json(&TokenRequest {
            apikey: &self.credentials.api_key,
            access_token: &self.credentials.access_token,
        })?;
        let request = TransportRequest::post(client.endpoint(TOKEN_ENDPOINT)).with_body(body);

        let raw = client.send(request).await?;
        let result = parse_token_response(&raw);

        if let Err(SwanError::Protocol {
            message: Some(message),
            ..
        }) = &result
        {
            if let Some(hint) = config_hint(message) {
                client.observer().record(&ClientEvent::ConfigHint { hint });
                client.observer().record(&ClientEvent::ConfigHint {
                    hint: CONFIG_DOCS_HINT,
                });
            }
        }

        result
    }
}

/// Pull the JWT out of a token response.
///
/// Any body mentioning the failure marker is a rejection unless it is an
/// explicit success that carries a token, since a JWT may contain the marker.
pub fn parse_token_response(raw: &str) -> Result<String> {
    let parsed = serde_json::from_str::<Value>(raw);
    let field = |name: &str| -> Option<String> {
        parsed
            .as_ref()
            .ok()
            .and_then(|value| value.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let token = parsed
        .as_ref()
        .ok()
        .and_then(|value| value.pointer("/data/jwt"))
        .and_then(Value::as_str)
        .filter(|token| !token.trim().is_empty())
        .map(str::to_string);

    let succeeded = field("status")
        .map(|status| status.eq_ignore_ascii_case(STATUS_SUCCESS))
        .unwrap_or(false);

    if raw.contains(FAILURE_MARKER) && !(succeeded && token.is_some()) {
        return Err(SwanError::Protocol {
            status: field("status").unwrap_or_default(),
            message: field("message").filter(|message| !message.is_empty()),
        });
    }

    parsed?;
    token.ok_or_else(|| SwanError::MissingField("data.jwt".to_string()))
}

/// Remediation hint for well-known credential rejections
pub fn config_hint(message: &str) -> Option<&'static str> {
    let message = message.trim();
    if message.eq_ignore_ascii_case(API_KEY_NOT_FOUND) {
        Some("please check your api_key in config")
    } else if message.eq_ignore_ascii_case(INVALID_API_TOKEN) {
        Some("please check your access_token in config")
    } else {
        None
    }
}

impl SwanClient {
    /// Exchange `credentials` for a token and return the ready session
    pub async fn authenticate(mut self, credentials: &Credentials) -> Result<Self> {
        Authenticator::new(credentials.clone())
            .authenticate(&mut self)
            .await?;
        Ok(self)
    }

    /// Authenticated session over the default HTTP transport
    pub async fn connect(api_url: &str, api_key: &str, access_token: &str) -> Result<Self> {
        Self::new(api_url)?
            .authenticate(&Credentials::new(api_key, access_token))
            .await
    }

    /// Use `jwt_token` when given, otherwise exchange the credentials for one
    pub async fn open(
        api_url: &str,
        api_key: &str,
        access_token: &str,
        jwt_token: Option<&str>,
    ) -> Result<Self> {
        match jwt_token.filter(|token| !token.trim().is_empty()) {
            Some(token) => Ok(Self::new(api_url)?.with_token(token)),
            None => Self::connect(api_url, api_key, access_token).await,
        }
    }
}
