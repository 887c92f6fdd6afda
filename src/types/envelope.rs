//! The `{errorCode, msg, result}` wrapper returned by every endpoint.

use serde::{Deserialize, Serialize};

/// Uniform success/error wrapper around every controller response.
///
/// `error_code == 0` means the call succeeded; `result` is only meaningful
/// in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Zero on success, a controller-specific negative code otherwise.
    pub error_code: i64,

    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    /// Payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// Creates a successful envelope.
    pub fn success(result: T) -> Self {
        Self {
            error_code: 0,
            msg: Some("Success.".to_string()),
            result: Some(result),
        }
    }

    /// Creates an error envelope.
    pub fn error(error_code: i64, msg: impl Into<String>) -> Self {
        Self {
            error_code,
            msg: Some(msg.into()),
            result: None,
        }
    }

    /// Returns true if the controller reported success.
    pub fn is_success(&self) -> bool {
        self.error_code == 0
    }

    /// The message, or an empty string when absent.
    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or("")
    }
}
