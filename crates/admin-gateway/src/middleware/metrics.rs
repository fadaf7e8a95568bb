//! Gateway metrics.
//!
//! Counters per outcome class plus a simple latency average. Exposed as
//! JSON at `/metrics` and, with the `metrics` feature, as Prometheus text.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// How one dispatched request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    Success,
    /// Backend rejected the call with a domain code
    Domain,
    /// Malformed request, answered without a backend call
    Binding,
    /// Attributable action arrived without identity
    Contract,
    /// Backend unreachable or protocol failure
    Transport,
    Deadline,
    /// Caller went away before the backend replied
    Cancelled,
}

/// Admin gateway metrics
#[derive(Default)]
pub struct GatewayMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,
    pub write_requests_total: AtomicU64,

    // Failure counters by class
    pub domain_errors: AtomicU64,
    pub binding_rejected: AtomicU64,
    pub contract_violations: AtomicU64,
    pub transport_errors: AtomicU64,
    pub deadline_exceeded: AtomicU64,
    pub cancelled: AtomicU64,

    // Authentication
    pub auth_rejected: AtomicU64,

    // Backend calls currently in flight
    pub in_flight: AtomicU64,

    // Latency tracking (average only)
    pub total_latency_ms: AtomicU64,
    pub request_count_for_latency: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished request
    pub fn record_request(&self, class: OutcomeClass, is_write: bool, latency_ms: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if is_write {
            self.write_requests_total.fetch_add(1, Ordering::Relaxed);
        }

        let counter = match class {
            OutcomeClass::Success => &self.requests_success,
            OutcomeClass::Domain => &self.domain_errors,
            OutcomeClass::Binding => &self.binding_rejected,
            OutcomeClass::Contract => &self.contract_violations,
            OutcomeClass::Transport => &self.transport_errors,
            OutcomeClass::Deadline => &self.deadline_exceeded,
            OutcomeClass::Cancelled => &self.cancelled,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        if class != OutcomeClass::Success {
            self.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.request_count_for_latency
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record an authentication rejection
    pub fn record_auth_rejection(&self) {
        self.auth_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Track one backend call. Dropping the guard before
    /// [`InFlightCall::complete`] counts the call as abandoned.
    pub fn track_call(&self) -> InFlightCall<'_> {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightCall {
            metrics: self,
            completed: false,
        }
    }

    /// Get average latency in ms
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        let count = self.request_count_for_latency.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics in Prometheus format
    #[cfg(feature = "metrics")]
    pub fn to_prometheus(&self) -> String {
        let mut output = String::new();
        let mut counter = |name: &str, help: &str, value: u64| {
            output.push_str(&format!(
                "# HELP admin_gateway_{name} {help}\n\
                 # TYPE admin_gateway_{name} counter\n\
                 admin_gateway_{name} {value}\n"
            ));
        };

        counter(
            "requests_total",
            "Total number of admin requests",
            self.requests_total.load(Ordering::Relaxed),
        );
        counter(
            "requests_success_total",
            "Successful requests",
            self.requests_success.load(Ordering::Relaxed),
        );
        counter(
            "requests_error_total",
            "Requests that did not end in success",
            self.requests_error.load(Ordering::Relaxed),
        );
        counter(
            "write_requests_total",
            "Requests for mutating actions",
            self.write_requests_total.load(Ordering::Relaxed),
        );
        counter(
            "domain_errors_total",
            "Requests rejected by the backend",
            self.domain_errors.load(Ordering::Relaxed),
        );
        counter(
            "binding_rejected_total",
            "Malformed requests answered without a backend call",
            self.binding_rejected.load(Ordering::Relaxed),
        );
        counter(
            "contract_violations_total",
            "Attributable actions without caller identity",
            self.contract_violations.load(Ordering::Relaxed),
        );
        counter(
            "transport_errors_total",
            "Backend unreachable or protocol failures",
            self.transport_errors.load(Ordering::Relaxed),
        );
        counter(
            "deadline_exceeded_total",
            "Backend calls that hit the deadline",
            self.deadline_exceeded.load(Ordering::Relaxed),
        );
        counter(
            "cancelled_total",
            "Backend calls abandoned after the caller went away",
            self.cancelled.load(Ordering::Relaxed),
        );
        counter(
            "auth_rejected_total",
            "Requests rejected by authentication",
            self.auth_rejected.load(Ordering::Relaxed),
        );

        output.push_str(&format!(
            "# HELP admin_gateway_in_flight Backend calls in flight\n\
             # TYPE admin_gateway_in_flight gauge\n\
             admin_gateway_in_flight {}\n",
            self.in_flight.load(Ordering::Relaxed)
        ));

        output.push_str(&format!(
            "# HELP admin_gateway_average_latency_ms Average request latency\n\
             # TYPE admin_gateway_average_latency_ms gauge\n\
             admin_gateway_average_latency_ms {:.2}\n",
            self.average_latency_ms()
        ));

        output
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "error": self.requests_error.load(Ordering::Relaxed),
                "writes": self.write_requests_total.load(Ordering::Relaxed),
            },
            "errors": {
                "domain": self.domain_errors.load(Ordering::Relaxed),
                "binding": self.binding_rejected.load(Ordering::Relaxed),
                "contract": self.contract_violations.load(Ordering::Relaxed),
                "transport": self.transport_errors.load(Ordering::Relaxed),
                "deadline": self.deadline_exceeded.load(Ordering::Relaxed),
                "cancelled": self.cancelled.load(Ordering::Relaxed),
            },
            "auth": {
                "rejected": self.auth_rejected.load(Ordering::Relaxed),
            },
            "backend": {
                "in_flight": self.in_flight.load(Ordering::Relaxed),
            },
            "latency": {
                "average_ms": self.average_latency_ms(),
            }
        })
    }
}

/// In-flight backend call, see [`GatewayMetrics::track_call`]
pub struct InFlightCall<'a> {
    metrics: &'a GatewayMetrics,
    completed: bool,
}

impl InFlightCall<'_> {
    pub fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for InFlightCall<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.fetch_sub(1, Ordering::Relaxed);
        if !self.completed {
            // Handler future dropped mid-call: the client went away
            self.metrics.cancelled.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Request timing helper
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<GatewayMetrics>,
    is_write: bool,
}

impl RequestTimer {
    pub fn new(metrics: Arc<GatewayMetrics>, is_write: bool) -> Self {
        Self {
            start: Instant::now(),
            metrics,
            is_write,
        }
    }

    pub fn finish(self, class: OutcomeClass) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.metrics
            .record_request(class, self.is_write, latency_ms);
    }
}
