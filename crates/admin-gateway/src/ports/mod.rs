//! Ports for the admin gateway.

pub mod outbound;

pub use outbound::{AdminBackend, RpcFailure};
