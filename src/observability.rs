//! Injected observability for the client stack
//!
//! Components never log through a global; each one is handed an
//! `Arc<dyn Observer>` when it is built. [`TracingObserver`] forwards to
//! `tracing`, [`NoopObserver`] discards everything and [`Metrics`] keeps
//! counters that can be snapshotted.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::SwanError;

/// Something worth reporting that happened inside the client
#[derive(Debug)]
pub enum ClientEvent<'a> {
    RequestSent {
        method: &'a str,
        url: &'a str,
        authenticated: bool,
    },
    RequestRejected {
        url: &'a str,
        status: u16,
        hint: &'static str,
    },
    OperationFailed {
        operation: &'static str,
        error: &'a SwanError,
    },
    AuthAttemptFailed {
        attempt: u32,
        error: &'a SwanError,
    },
    TokenAcquired {
        attempts: u32,
    },
    ConfigHint {
        hint: &'static str,
    },
    FileUploaded {
        url: &'a str,
        filename: &'a str,
    },
}

/// Sink for [`ClientEvent`]s
pub trait Observer: Send + Sync {
    fn record(&self, event: &ClientEvent<'_>);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn record(&self, _event: &ClientEvent<'_>) {}
}

/// Forwards events to the `tracing` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn record(&self, event: &ClientEvent<'_>) {
        match event {
            ClientEvent::RequestSent {
                method,
                url,
                authenticated,
            } => tracing::debug!(method, url, authenticated, "Sending request"),
            ClientEvent::RequestRejected { url, status, hint } => {
                tracing::error!(url, status, hint, "Swan platform rejected request")
            }
            ClientEvent::OperationFailed { operation, error } => {
                tracing::error!(operation, code = error.code(), error = %error, "Operation failed")
            }
            ClientEvent::AuthAttemptFailed { attempt, error } => {
                tracing::warn!(attempt, error = %error, "Token request failed")
            }
            ClientEvent::TokenAcquired { attempts } => {
                tracing::info!(attempts, "Acquired swan token")
            }
            ClientEvent::ConfigHint { hint } => tracing::error!("{}", hint),
            ClientEvent::FileUploaded { url, filename } => {
                tracing::info!(url, filename, "Upload accepted")
            }
        }
    }
}

/// Counters for client activity
#[derive(Debug, Default)]
pub struct Metrics {
    requests_sent: AtomicU64,
    requests_rejected: AtomicU64,
    operations_failed: AtomicU64,
    auth_attempts_failed: AtomicU64,
    tokens_acquired: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            operations_failed: self.operations_failed.load(Ordering::Relaxed),
            auth_attempts_failed: self.auth_attempts_failed.load(Ordering::Relaxed),
            tokens_acquired: self.tokens_acquired.load(Ordering::Relaxed),
        }
    }
}

impl Observer for Metrics {
    fn record(&self, event: &ClientEvent<'_>) {
        let counter = match event {
            ClientEvent::RequestSent { .. } => &self.requests_sent,
            ClientEvent::RequestRejected { .. } => &self.requests_rejected,
            ClientEvent::OperationFailed { .. } => &self.operations_failed,
            ClientEvent::AuthAttemptFailed { .. } => &self.auth_attempts_failed,
            ClientEvent::TokenAcquired { .. } => &self.tokens_acquired,
            ClientEvent::ConfigHint { .. } | ClientEvent::FileUploaded { .. } => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_sent: u64,
    pub requests_rejected: u64,
    pub operations_failed: u64,
    pub auth_attempts_failed: u64,
    pub tokens_acquired: u64,
}
