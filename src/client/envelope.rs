//! The `{status, data, message?}` wrapper around every platform response

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Result, SwanError};

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// A parsed response: typed payload on success, status and message otherwise
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success { data: T, message: Option<String> },
    Failure { status: String, message: Option<String> },
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse raw response text.
    ///
    /// Invalid JSON, or a success payload that does not fit `T`, is a
    /// [`SwanError::Parse`]. A non-success status is not an error here.
    pub fn parse(raw: &str) -> Result<Self> {
        let envelope: RawEnvelope = serde_json::from_str(raw)?;
        let status = envelope.status.unwrap_or_default();

        if !status.eq_ignore_ascii_case(STATUS_SUCCESS) {
            // Some endpoints put the failure message inside `data`
            let message = envelope.message.or_else(|| {
                envelope
                    .data
                    .as_ref()
                    .and_then(|data| data.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            return Ok(Envelope::Failure { status, message });
        }

        let data = match envelope.data {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(data) => data,
        };

        Ok(Envelope::Success {
            data: serde_json::from_value(data)?,
            message: envelope.message,
        })
    }
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    /// The payload, or a [`SwanError::Protocol`] carrying status and message
    pub fn into_data(self) -> Result<T> {
        match self {
            Envelope::Success { data, .. } => Ok(data),
            Envelope::Failure { status, message } => Err(SwanError::Protocol { status, message }),
        }
    }
}
