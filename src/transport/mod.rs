//! Single-request HTTP transport
//!
//! A [`Transport`] performs exactly one round trip per call and classifies the
//! outcome: HTTP 200 yields the raw body text, anything else becomes a
//! [`SwanError`](crate::error::SwanError). Retrying is left to callers.

mod body;
mod http;

pub use body::{CONTENT_TYPE_JSON, FormBody, MultipartUpload, RequestBody};
pub use http::HttpTransport;

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;

/// One outbound request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub token: Option<String>,
    pub body: RequestBody,
}

impl TransportRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            token: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Token to send, if any remains after trimming whitespace
    pub fn bearer(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// Executes a request and returns the response body of an HTTP 200
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<String>;
}
