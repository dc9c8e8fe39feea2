//! Session with the Swan platform
//!
//! [`SwanClient`] holds the base API URL and the bearer token. Every protocol
//! operation follows the same shape: validate inputs, build the endpoint URL,
//! run one transport call, parse the [`Envelope`] and hand back its payload.

mod deals;
mod envelope;
mod tasks;

pub use envelope::{Envelope, STATUS_SUCCESS};

use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::auth::Credentials;
use crate::config::{Config, HttpConfig};
use crate::error::{Result, SwanError};
use crate::observability::{ClientEvent, Observer, TracingObserver};
use crate::transport::{HttpTransport, Transport, TransportRequest};

pub const DEFAULT_DEAL_LIMIT: usize = 50;

/// Authenticated (or about to be) session with the platform
pub struct SwanClient {
    api_url: String,
    token: Option<String>,
    deal_limit: usize,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn Observer>,
}

impl fmt::Debug for SwanClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwanClient")
            .field("api_url", &self.api_url)
            .field("has_token", &self.token.is_some())
            .field("deal_limit", &self.deal_limit)
            .finish()
    }
}

impl SwanClient {
    /// Unauthenticated session over a default [`HttpTransport`]
    pub fn new(api_url: &str) -> Result<Self> {
        let transport = HttpTransport::new(&HttpConfig::default())?;
        Self::with_transport(api_url, Arc::new(transport))
    }

    /// Unauthenticated session over any transport
    pub fn with_transport(api_url: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let api_url = api_url.trim().trim_end_matches('/');
        if api_url.is_empty() {
            return Err(SwanError::validation("api url is required"));
        }

        Ok(Self {
            api_url: api_url.to_string(),
            token: None,
            deal_limit: DEFAULT_DEAL_LIMIT,
            transport,
            observer: Arc::new(TracingObserver),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Install a token obtained elsewhere; it is trusted without validation
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Page size used by offline deal listings when no limit is given
    pub fn with_deal_limit(mut self, limit: usize) -> Self {
        self.deal_limit = limit;
        self
    }

    /// Build a ready session from configuration.
    ///
    /// A configured JWT is used as is; otherwise the API key and access token
    /// are exchanged for one.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let observer: Arc<dyn Observer> = Arc::new(TracingObserver);
        let transport = HttpTransport::with_observer(&config.http, observer.clone())?;

        let client = Self::with_transport(&config.swan.api_url, Arc::new(transport))?
            .with_observer(observer)
            .with_deal_limit(config.deals.default_limit);

        match config.swan.jwt_token.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => Ok(client.with_token(token)),
            None => {
                let credentials = Credentials::new(
                    config.swan.api_key.clone().unwrap_or_default(),
                    config.swan.access_token.clone().unwrap_or_default(),
                );
                client.authenticate(&credentials).await
            }
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub(crate) fn observer(&self) -> &dyn Observer {
        self.observer.as_ref()
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Attach the session token to a request
    pub(crate) fn authorized(&self, request: TransportRequest) -> TransportRequest {
        request.with_token(self.token.as_deref())
    }

    /// One transport call; an empty body is a failure even under HTTP 200
    pub(crate) async fn send(&self, request: TransportRequest) -> Result<String> {
        let url = request.url.clone();
        let raw = self.transport.execute(request).await?;

        if raw.trim().is_empty() {
            return Err(SwanError::EmptyResponse { url });
        }

        Ok(raw)
    }

    /// Send, parse the envelope and return its payload
    pub(crate) async fn call<T: DeserializeOwned>(&self, request: TransportRequest) -> Result<T> {
        let raw = self.send(request).await?;
        Envelope::<T>::parse(&raw)?.into_data()
    }

    /// Report a failed operation to the observer before returning it
    pub(crate) async fn observed<T, F>(&self, operation: &'static str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let result = future.await;
        if let Err(error) = &result {
            self.observer
                .record(&ClientEvent::OperationFailed { operation, error });
        }
        result
    }
}

/// Fail fast on a blank required input
pub(crate) fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SwanError::validation(format!("{} is required", what)));
    }
    Ok(())
}
