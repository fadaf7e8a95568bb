//! Error taxonomy for the admin gateway.
//!
//! Four families, each resolved differently:
//!
//! - [`BindingError::Malformed`]: client-caused, answered with 400.
//! - [`BindingError::MissingIdentity`]: upstream contract violation, answered with 500.
//! - Domain errors: backend rejections carrying a code from [`codes`].
//! - [`TransportError`]: network or deadline failure, answered with 503/504.

/// Domain error codes defined by the backend administrative contract.
///
/// Codes travel as strings so that codes added by the backend later still
/// reach the caller with their message intact.
pub mod codes {
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const FAILED_PRECONDITION: &str = "FAILED_PRECONDITION";
    pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const ABORTED: &str = "ABORTED";
    pub const CONFLICT: &str = "CONFLICT";
    pub const INTERNAL: &str = "INTERNAL";
    pub const UNKNOWN: &str = "UNKNOWN";
    pub const DATA_LOSS: &str = "DATA_LOSS";
    pub const UNIMPLEMENTED: &str = "UNIMPLEMENTED";
    pub const UNAVAILABLE: &str = "UNAVAILABLE";
    pub const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";
    pub const CANCELLED: &str = "CANCELLED";
    pub const DEADLINE_EXCEEDED: &str = "DEADLINE_EXCEEDED";

    /// Every code the backend contract defines.
    pub const ALL: [&str; 17] = [
        INVALID_ARGUMENT,
        FAILED_PRECONDITION,
        OUT_OF_RANGE,
        UNAUTHENTICATED,
        PERMISSION_DENIED,
        NOT_FOUND,
        ALREADY_EXISTS,
        ABORTED,
        CONFLICT,
        INTERNAL,
        UNKNOWN,
        DATA_LOSS,
        UNIMPLEMENTED,
        UNAVAILABLE,
        RESOURCE_EXHAUSTED,
        CANCELLED,
        DEADLINE_EXCEEDED,
    ];

    // Gateway-originated codes (never sent by the backend)
    pub const INVALID_REQUEST_BODY: &str = "INVALID_REQUEST_BODY";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
}

/// Failure to turn an inbound request into a typed action request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// Body, path or query did not decode into the action's structure
    #[error("malformed request: {0}")]
    Malformed(String),

    /// The action is attributable but no caller identity was attached upstream
    #[error("caller identity missing for attributable action '{action}'")]
    MissingIdentity { action: &'static str },
}

impl BindingError {
    /// Client-fixable errors; everything else is a contract violation.
    pub fn is_client_error(&self) -> bool {
        matches!(self, BindingError::Malformed(_))
    }
}

impl From<serde_json::Error> for BindingError {
    fn from(e: serde_json::Error) -> Self {
        BindingError::Malformed(e.to_string())
    }
}

/// Network-level failure talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The deadline scope elapsed before the backend replied
    #[error("deadline exceeded")]
    Deadline,

    /// The scope was cancelled (client went away) before the backend replied
    #[error("call cancelled")]
    Cancelled,

    /// Connection refused, reset, DNS failure and the like
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with something that is not a JSON-RPC reply
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Gateway-level errors (startup and serving, not per-request)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] crate::domain::config::ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Backend client could not be constructed
    #[error("backend client error: {0}")]
    Backend(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
