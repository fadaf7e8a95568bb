//! Domain types for the admin gateway.
//!
//! Configuration, error taxonomy, the action catalogue and the response
//! envelope. Nothing here performs I/O except configuration loading.

pub mod actions;
pub mod config;
pub mod correlation;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod requests;

// Re-exports for convenience
pub use actions::{Action, ActionCategory, ActionDescriptor, ACTION_TABLE};
pub use config::{ConfigError, GatewayConfig};
pub use correlation::CorrelationId;
pub use envelope::{ErrorBody, ResponseEnvelope};
pub use error::{codes, BindingError, GatewayError, TransportError};
pub use identity::CallerIdentity;
pub use requests::*;
