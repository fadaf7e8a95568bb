// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! Admin Gateway - REST surface for operator moderation actions.
//!
//! Every action is bound from the inbound request, forwarded as exactly one
//! JSON-RPC call to the backend administrative service under a deadline, and
//! translated into a uniform response envelope.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                           ADMIN GATEWAY                              │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │   Tracing → CORS → BodyLimit → Auth (attaches CallerIdentity)        │
//! │                            │                                         │
//! │   ┌────────────────────────┴──────────────────────────────┐          │
//! │   │                  ActionDispatcher                     │          │
//! │   │  binder → deadline scope → invoker → translator       │          │
//! │   └────────────────────────┬──────────────────────────────┘          │
//! │                            │  ACTION_TABLE (method, identity, msg)   │
//! └────────────────────────────┼─────────────────────────────────────────┘
//!                              │ JSON-RPC 2.0 / HTTP (pooled)
//!                              ▼
//!                 Backend administrative service
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use admin_gateway::{AdminGatewayService, GatewayConfig, JsonRpcBackend};
//!
//! let config = GatewayConfig::load(None)?;
//! let backend = JsonRpcBackend::new(&config.backend)?;
//! let service = AdminGatewayService::new(config, Arc::new(backend))?;
//! service.run(shutdown_signal()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod middleware;
pub mod ports;
pub mod router;
pub mod service;

// Re-exports for public API
pub use adapters::JsonRpcBackend;
pub use dispatch::{ActionDispatcher, Outcome, RawInput, Resolved};
pub use domain::actions::{Action, ActionDescriptor, ACTION_TABLE};
pub use domain::config::GatewayConfig;
pub use domain::envelope::{ErrorBody, ResponseEnvelope};
pub use domain::error::{BindingError, GatewayError, TransportError};
pub use domain::identity::CallerIdentity;
pub use middleware::GatewayMetrics;
pub use ports::{AdminBackend, RpcFailure};
pub use service::AdminGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
