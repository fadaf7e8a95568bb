//! RPC invoker: one remote call inside a deadline scope.

use super::deadline::DeadlineScope;
use crate::domain::correlation::CorrelationId;
use crate::domain::error::TransportError;
use crate::ports::outbound::{AdminBackend, RpcFailure};
use serde_json::Value;
use tracing::debug;

/// Result of one remote call. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    /// Backend rejection, code and message verbatim
    DomainError { code: String, message: String },
    Transport(TransportError),
}

impl From<Result<Value, RpcFailure>> for Outcome {
    fn from(result: Result<Value, RpcFailure>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(RpcFailure::Domain { code, message }) => Outcome::DomainError { code, message },
            Err(RpcFailure::Transport(e)) => Outcome::Transport(e),
        }
    }
}

/// Invoke `method` once. Never retries.
///
/// The call is raced against the scope: if the deadline elapses or the
/// scope is released first, the backend future is dropped and the outcome
/// is a transport error. A reply that is already ready wins the race.
pub async fn invoke(
    backend: &dyn AdminBackend,
    id: CorrelationId,
    method: &'static str,
    params: Value,
    scope: &DeadlineScope,
) -> Outcome {
    if scope.is_cancelled() {
        return Outcome::Transport(scope_error(scope));
    }

    tokio::select! {
        biased;
        result = backend.call(id, method, params, scope) => Outcome::from(result),
        _ = scope.cancelled() => {
            let error = scope_error(scope);
            debug!(method, %error, "call abandoned");
            Outcome::Transport(error)
        }
    }
}

fn scope_error(scope: &DeadlineScope) -> TransportError {
    if scope.is_expired() {
        TransportError::Deadline
    } else {
        TransportError::Cancelled
    }
}
