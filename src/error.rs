//! Error taxonomy shared by the transport, session and authenticator layers.

use std::path::PathBuf;
use thiserror::Error;

/// Sub-classification of a non-200 HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// 404, usually a wrong base URL or path
    NotFound,
    /// 401, usually a missing or expired bearer token
    Unauthorized,
    Other,
}

impl StatusKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => StatusKind::NotFound,
            401 => StatusKind::Unauthorized,
            _ => StatusKind::Other,
        }
    }

    /// Operator-facing remediation hint
    pub fn hint(&self) -> &'static str {
        match self {
            StatusKind::NotFound => "please check your url",
            StatusKind::Unauthorized => "please check your token",
            StatusKind::Other => "bad status",
        }
    }
}

#[derive(Debug, Error)]
pub enum SwanError {
    /// Missing or malformed input, raised before any network call
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build request: {0}")]
    RequestBuild(String),

    #[error("http status {status} from {url} ({})", .kind.hint())]
    HttpStatus {
        status: u16,
        url: String,
        kind: StatusKind,
    },

    #[error("no response from swan platform: {url}")]
    EmptyResponse { url: String },

    /// Task listing answered with an empty body
    #[error("failed to get tasks from swan: {url}")]
    NoTasks { url: String },

    #[error("status:{status}, message:{}", .message.as_deref().unwrap_or(""))]
    Protocol {
        status: String,
        message: Option<String>,
    },

    #[error("response is missing field '{0}'")]
    MissingField(String),

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a regular file", .path.display())]
    NotRegularFile { path: PathBuf },

    #[error("failed to connect to swan platform after trying {attempts} times: {source}")]
    AuthExhausted {
        attempts: u32,
        #[source]
        source: Box<SwanError>,
    },
}

impl SwanError {
    pub fn validation(message: impl Into<String>) -> Self {
        SwanError::Validation(message.into())
    }

    /// Short machine-readable tag, used as a structured log field
    pub fn code(&self) -> &'static str {
        match self {
            SwanError::Validation(_) => "VALIDATION",
            SwanError::Transport { .. } | SwanError::RequestBuild(_) => "TRANSPORT",
            SwanError::HttpStatus { .. } => "HTTP_STATUS",
            SwanError::EmptyResponse { .. } | SwanError::NoTasks { .. } => "EMPTY_RESPONSE",
            SwanError::Protocol { .. } | SwanError::MissingField(_) => "PROTOCOL",
            SwanError::Parse(_) => "PARSE",
            SwanError::ReadFile { .. } => "READ_ERROR",
            SwanError::NotRegularFile { .. } => "NOT_REGULAR_FILE",
            SwanError::AuthExhausted { .. } => "AUTH_EXHAUSTED",
        }
    }

    /// Status sub-tag for HTTP failures
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self {
            SwanError::HttpStatus { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SwanError>;
