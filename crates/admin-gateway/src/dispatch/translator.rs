//! Outcome translator: call outcome into HTTP status plus envelope.
//!
//! [`STATUS_TABLE`] is the only place a domain code acquires an HTTP
//! status. It is built once and read concurrently by every request.

use super::invoker::Outcome;
use crate::domain::actions::ActionDescriptor;
use crate::domain::envelope::ResponseEnvelope;
use crate::domain::error::{codes, BindingError, TransportError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const MSG_INVALID_BODY: &str = "invalid request body";
pub const MSG_INTERNAL: &str = "internal server error";
pub const MSG_TIMED_OUT: &str = "upstream timed out";
pub const MSG_UNAVAILABLE: &str = "upstream unavailable";

/// Domain code to HTTP status, total over [`codes::ALL`].
pub static STATUS_TABLE: LazyLock<HashMap<&'static str, StatusCode>> = LazyLock::new(|| {
    use codes::*;
    HashMap::from([
        (INVALID_ARGUMENT, StatusCode::BAD_REQUEST),
        (FAILED_PRECONDITION, StatusCode::BAD_REQUEST),
        (OUT_OF_RANGE, StatusCode::BAD_REQUEST),
        (PERMISSION_DENIED, StatusCode::FORBIDDEN),
        (UNAUTHENTICATED, StatusCode::FORBIDDEN),
        (NOT_FOUND, StatusCode::NOT_FOUND),
        (ALREADY_EXISTS, StatusCode::CONFLICT),
        (ABORTED, StatusCode::CONFLICT),
        (CONFLICT, StatusCode::CONFLICT),
        (INTERNAL, StatusCode::INTERNAL_SERVER_ERROR),
        (UNKNOWN, StatusCode::INTERNAL_SERVER_ERROR),
        (DATA_LOSS, StatusCode::INTERNAL_SERVER_ERROR),
        (UNIMPLEMENTED, StatusCode::INTERNAL_SERVER_ERROR),
        (UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE),
        (RESOURCE_EXHAUSTED, StatusCode::SERVICE_UNAVAILABLE),
        (CANCELLED, StatusCode::SERVICE_UNAVAILABLE),
        (DEADLINE_EXCEEDED, StatusCode::GATEWAY_TIMEOUT),
    ])
});

/// Status for a domain code; unmapped codes are 500.
pub fn status_for(code: &str) -> StatusCode {
    STATUS_TABLE
        .get(code)
        .copied()
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Terminal state of a request: one status, one envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub status: StatusCode,
    pub envelope: ResponseEnvelope,
}

impl Resolved {
    fn failure(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            envelope: ResponseEnvelope::failure(status.as_u16(), code, message),
        }
    }
}

impl IntoResponse for Resolved {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

/// Translate the outcome of `descriptor`'s remote call.
pub fn translate(descriptor: &ActionDescriptor, outcome: Outcome) -> Resolved {
    match outcome {
        Outcome::Success(payload) => Resolved {
            status: StatusCode::OK,
            envelope: ResponseEnvelope::success(descriptor.success_message, payload),
        },
        Outcome::DomainError { code, message } => {
            Resolved::failure(status_for(&code), &code, message)
        }
        Outcome::Transport(error) => transport(&error),
    }
}

/// Response for a request that failed binding. No call was made.
pub fn reject(error: &BindingError) -> Resolved {
    match error {
        BindingError::Malformed(_) => Resolved::failure(
            StatusCode::BAD_REQUEST,
            codes::INVALID_REQUEST_BODY,
            MSG_INVALID_BODY,
        ),
        BindingError::MissingIdentity { .. } => Resolved::failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            MSG_INTERNAL,
        ),
    }
}

fn transport(error: &TransportError) -> Resolved {
    match error {
        TransportError::Deadline => Resolved::failure(
            StatusCode::GATEWAY_TIMEOUT,
            codes::DEADLINE_EXCEEDED,
            MSG_TIMED_OUT,
        ),
        TransportError::Cancelled
        | TransportError::Unreachable(_)
        | TransportError::Protocol(_) => Resolved::failure(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::UNAVAILABLE,
            MSG_UNAVAILABLE,
        ),
    }
}
