//! Scripted in-process backend for tests.

use crate::dispatch::deadline::DeadlineScope;
use crate::domain::correlation::CorrelationId;
use crate::domain::error::TransportError;
use crate::ports::outbound::{AdminBackend, RpcFailure};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What the stub answers to every call
#[derive(Debug, Clone)]
pub enum StubReply {
    Success(Value),
    Domain { code: String, message: String },
    Transport(TransportError),
    /// Reply with the value after a delay
    Delayed(Duration, Value),
    /// Never reply
    Hang,
}

impl StubReply {
    pub fn domain(code: impl Into<String>, message: impl Into<String>) -> Self {
        StubReply::Domain {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Backend stub with a call counter, recorded params and a cancellation
/// flag set when an unfinished call's scope is cancelled.
pub struct StubBackend {
    reply: Mutex<StubReply>,
    calls: AtomicUsize,
    last_call: Mutex<Option<(&'static str, Value)>>,
    last_id: Mutex<Option<CorrelationId>>,
    cancelled: Arc<AtomicBool>,
}

impl StubBackend {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply: Mutex::new(reply),
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
            last_id: Mutex::new(None),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_reply(&self, reply: StubReply) {
        *self.reply.lock() = reply;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Method and params of the most recent call
    pub fn last_call(&self) -> Option<(&'static str, Value)> {
        self.last_call.lock().clone()
    }

    pub fn last_id(&self) -> Option<CorrelationId> {
        *self.last_id.lock()
    }

    /// Wait (up to one second) for the first call to arrive.
    pub async fn wait_for_call(&self) -> bool {
        poll_until(|| self.call_count() > 0).await
    }

    /// Wait (up to one second) for a pending call to observe cancellation.
    pub async fn was_cancelled(&self) -> bool {
        poll_until(|| self.cancelled.load(Ordering::SeqCst)).await
    }
}

async fn poll_until(mut done: impl FnMut() -> bool) -> bool {
    let give_up = tokio::time::Instant::now() + Duration::from_secs(1);
    while !done() {
        if tokio::time::Instant::now() >= give_up {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    true
}

#[async_trait]
impl AdminBackend for StubBackend {
    async fn call(
        &self,
        id: CorrelationId,
        method: &'static str,
        params: Value,
        scope: &DeadlineScope,
    ) -> Result<Value, RpcFailure> {
        *self.last_call.lock() = Some((method, params));
        *self.last_id.lock() = Some(id);
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = self.reply.lock().clone();
        match reply {
            StubReply::Success(value) => Ok(value),
            StubReply::Domain { code, message } => Err(RpcFailure::Domain { code, message }),
            StubReply::Transport(e) => Err(RpcFailure::Transport(e)),
            StubReply::Delayed(delay, value) => {
                tokio::time::sleep(delay).await;
                Ok(value)
            }
            StubReply::Hang => {
                let watched = scope.clone();
                let flag = self.cancelled.clone();
                tokio::spawn(async move {
                    watched.cancelled().await;
                    flag.store(true, Ordering::SeqCst);
                });
                std::future::pending().await
            }
        }
    }
}
