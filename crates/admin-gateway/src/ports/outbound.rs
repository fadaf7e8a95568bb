//! Outbound port to the backend administrative service.

use crate::dispatch::deadline::DeadlineScope;
use crate::domain::correlation::CorrelationId;
use crate::domain::error::TransportError;
use async_trait::async_trait;

/// Structured failure of one remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcFailure {
    /// Backend rejected the call; code and message are the backend's own
    #[error("[{code}] {message}")]
    Domain { code: String, message: String },

    /// The call never produced a structured reply
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Client for the backend administrative service.
///
/// Implementations must be safe for concurrent use by many in-flight
/// requests and perform exactly one network call per `call`.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// Invoke `method` with `params`. The scope carries the deadline and a
    /// cancellation signal the implementation should observe; `id` tags the
    /// call on the wire.
    async fn call(
        &self,
        id: CorrelationId,
        method: &'static str,
        params: serde_json::Value,
        scope: &DeadlineScope,
    ) -> Result<serde_json::Value, RpcFailure>;
}
