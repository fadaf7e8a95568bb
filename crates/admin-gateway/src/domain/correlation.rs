//! Per-call correlation id.
//!
//! A UUID v7 minted once per dispatched action. It is the JSON-RPC `id` of
//! the outbound call, the `correlation_id` field of the dispatch span and
//! the fallback `x-request-id` when the caller sent none.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Whether a reply id echoed by the backend names this call.
    ///
    /// Any textual UUID form (hyphenated, simple, upper case) is accepted.
    pub fn matches_reply(&self, reply_id: &str) -> bool {
        Self::parse(reply_id).is_ok_and(|other| other == *self)
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
