//! Uniform response envelope returned by every action.

use serde::{Deserialize, Serialize};

/// Error details carried by a failed envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Domain code from the backend, or a gateway code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// `{ message, data, errorCode, errorBody }`, identical in shape for
/// success and failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub error_code: Option<u16>,
    pub error_body: Option<ErrorBody>,
}

impl ResponseEnvelope {
    /// Successful envelope; `data` is the backend payload, unmodified.
    pub fn success(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            error_code: None,
            error_body: None,
        }
    }

    /// Failed envelope with the HTTP status mirrored into `errorCode`.
    pub fn failure(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: message.clone(),
            data: None,
            error_code: Some(status),
            error_body: Some(ErrorBody {
                code: code.into(),
                message,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_body.is_none()
    }
}
