//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::sync::Arc;

use super::body::{CONTENT_TYPE_JSON, RequestBody};
use super::{Transport, TransportRequest};
use crate::config::HttpConfig;
use crate::error::{Result, StatusKind, SwanError};
use crate::observability::{ClientEvent, Observer, TracingObserver};

/// Transport over a shared `reqwest::Client`
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    observer: Arc<dyn Observer>,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    pub fn with_observer(config: &HttpConfig, observer: Arc<dyn Observer>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout.as_duration())
            .timeout(config.request_timeout.as_duration())
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| SwanError::RequestBuild(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, observer })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> Result<String> {
        let bearer = request.bearer().map(str::to_string);
        let TransportRequest {
            method, url, body, ..
        } = request;

        let mut builder = self.client.request(method.clone(), &url);

        builder = match body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, CONTENT_TYPE_JSON),
            RequestBody::Json(value) => {
                let payload = serde_json::to_vec(&value)
                    .map_err(|e| SwanError::RequestBuild(e.to_string()))?;
                builder.header(CONTENT_TYPE, CONTENT_TYPE_JSON).body(payload)
            }
            RequestBody::Form(form) => builder
                .header(
                    CONTENT_TYPE,
                    mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
                )
                .body(form.into_bytes()),
            // reqwest sets multipart/form-data with the boundary
            RequestBody::Multipart(upload) => builder.multipart(upload.into_form().await?),
        };

        if let Some(token) = &bearer {
            builder = builder.bearer_auth(token);
        }

        self.observer.record(&ClientEvent::RequestSent {
            method: method.as_str(),
            url: &url,
            authenticated: bearer.is_some(),
        });

        let response = builder
            .send()
            .await
            .map_err(|source| SwanError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let kind = StatusKind::from_status(status.as_u16());
            self.observer.record(&ClientEvent::RequestRejected {
                url: &url,
                status: status.as_u16(),
                hint: kind.hint(),
            });
            return Err(SwanError::HttpStatus {
                status: status.as_u16(),
                url,
                kind,
            });
        }

        response
            .text()
            .await
            .map_err(|source| SwanError::Transport { url, source })
    }
}
