//! Middleware stack for the admin gateway.
//!
//! Layer order: Request → Tracing → CORS → BodyLimit → Auth (action routes only) → Handler

pub mod auth;
pub mod cors;
pub mod metrics;
pub mod tracing;

pub use auth::{constant_time_compare, AuthLayer};
pub use cors::create_cors_layer;
pub use metrics::{GatewayMetrics, InFlightCall, OutcomeClass, RequestTimer};
pub use tracing::TracingLayer;
