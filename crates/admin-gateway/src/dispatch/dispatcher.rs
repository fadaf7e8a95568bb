//! Action dispatcher.
//!
//! One generic engine for every action: bind, acquire a deadline scope,
//! invoke the descriptor's remote method once, translate. Each request
//! moves `Unbound -> Bound -> Dispatched -> Resolved` with no other edges.

use super::binder::{self, RawInput};
use super::deadline;
use super::invoker::{self, Outcome};
use super::translator::{self, Resolved};
use crate::domain::correlation::CorrelationId;
use crate::domain::error::{BindingError, TransportError};
use crate::domain::requests::ActionRequest;
use crate::middleware::metrics::{GatewayMetrics, OutcomeClass, RequestTimer};
use crate::ports::outbound::AdminBackend;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Shared by every in-flight request. Holds only read-only state plus the
/// backend handle, which is safe for concurrent use.
#[derive(Clone)]
pub struct ActionDispatcher {
    backend: Arc<dyn AdminBackend>,
    call_timeout: Duration,
    metrics: Arc<GatewayMetrics>,
}

impl ActionDispatcher {
    pub fn new(
        backend: Arc<dyn AdminBackend>,
        call_timeout: Duration,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            backend,
            call_timeout,
            metrics,
        }
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }

    /// Run the action bound to `R` for one inbound request.
    pub async fn dispatch<R: ActionRequest>(&self, input: RawInput) -> Resolved {
        let descriptor = R::ACTION.descriptor();
        let timer = RequestTimer::new(self.metrics.clone(), descriptor.is_write);

        // Unbound -> Bound
        let params = match binder::bind::<R>(input).and_then(|bound| bound.wire_params()) {
            Ok(params) => params,
            Err(e) => return self.rejected(descriptor.name, timer, &e),
        };

        // Bound -> Dispatched
        let id = CorrelationId::new();
        let span = info_span!(
            "dispatch",
            action = descriptor.name,
            method = descriptor.remote_method,
            correlation_id = %id,
        );
        let (scope, release) = deadline::acquire(self.call_timeout);
        let call = self.metrics.track_call();
        let outcome = invoker::invoke(
            self.backend.as_ref(),
            id,
            descriptor.remote_method,
            params,
            &scope,
        )
        .instrument(span.clone())
        .await;
        call.complete();
        release.release();

        // Dispatched -> Resolved
        let class = span.in_scope(|| log_outcome(&outcome, self.call_timeout));
        timer.finish(class);
        translator::translate(descriptor, outcome)
    }

    /// Resolve a request for `R` that could not be turned into raw input
    /// (unreadable body, bad query string). No call is made.
    pub fn refuse<R: ActionRequest>(&self, error: &BindingError) -> Resolved {
        let descriptor = R::ACTION.descriptor();
        let timer = RequestTimer::new(self.metrics.clone(), descriptor.is_write);
        self.rejected(descriptor.name, timer, error)
    }

    fn rejected(&self, action: &'static str, timer: RequestTimer, error: &BindingError) -> Resolved {
        timer.finish(log_binding_error(action, error));
        translator::reject(error)
    }
}

fn log_binding_error(action: &'static str, e: &BindingError) -> OutcomeClass {
    match e {
        BindingError::Malformed(reason) => {
            debug!(action, %reason, "request rejected");
            OutcomeClass::Binding
        }
        BindingError::MissingIdentity { .. } => {
            error!(action, error = %e, "authentication layer did not attach caller identity");
            OutcomeClass::Contract
        }
    }
}

fn log_outcome(outcome: &Outcome, timeout: Duration) -> OutcomeClass {
    match outcome {
        Outcome::Success(_) => {
            debug!("backend call succeeded");
            OutcomeClass::Success
        }
        Outcome::DomainError { code, message } => {
            info!(%code, %message, "backend rejected action");
            OutcomeClass::Domain
        }
        Outcome::Transport(TransportError::Deadline) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "backend call timed out");
            OutcomeClass::Deadline
        }
        Outcome::Transport(TransportError::Cancelled) => {
            debug!("backend call cancelled");
            OutcomeClass::Cancelled
        }
        Outcome::Transport(e) => {
            warn!(error = %e, "backend call failed");
            OutcomeClass::Transport
        }
    }
}
