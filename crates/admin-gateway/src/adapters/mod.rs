//! Adapters for the admin gateway.
//!
//! Implementations of the outbound [`AdminBackend`](crate::ports::AdminBackend) port.

pub mod jsonrpc;
#[cfg(any(test, feature = "testing"))]
pub mod stub;

pub use jsonrpc::JsonRpcBackend;
#[cfg(any(test, feature = "testing"))]
pub use stub::{StubBackend, StubReply};
