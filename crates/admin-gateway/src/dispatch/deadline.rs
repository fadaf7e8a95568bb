//! Deadline scope: a time-bounded, cancellable unit of work for one
//! downstream call.
//!
//! [`acquire`] hands out the scope together with its [`ScopeRelease`]
//! guard. The guard signals cancellation when released explicitly or when
//! dropped, so every exit path (return, error, unwind, or the handler
//! future being dropped after a client disconnect) releases the scope.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::trace;

/// Deadline and cancellation signal observed by the RPC invoker.
#[derive(Debug, Clone)]
pub struct DeadlineScope {
    deadline: Instant,
    timeout: Duration,
    released: watch::Receiver<bool>,
}

/// Guard that releases a [`DeadlineScope`]. Releasing is idempotent.
#[derive(Debug)]
pub struct ScopeRelease {
    released: watch::Sender<bool>,
}

/// Create a scope bounded by `timeout` from now.
pub fn acquire(timeout: Duration) -> (DeadlineScope, ScopeRelease) {
    let (tx, rx) = watch::channel(false);
    let scope = DeadlineScope {
        deadline: Instant::now() + timeout,
        timeout,
        released: rx,
    };
    (scope, ScopeRelease { released: tx })
}

impl DeadlineScope {
    /// Absolute deadline
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Configured bound this scope was created with
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Time left before the deadline (zero once expired)
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// True once the scope was released or its deadline elapsed.
    pub fn is_cancelled(&self) -> bool {
        *self.released.borrow() || self.is_expired()
    }

    /// Resolves when the scope is released or the deadline elapses.
    pub async fn cancelled(&self) {
        let mut released = self.released.clone();
        tokio::select! {
            // Err means the guard is gone, which also ends the scope
            _ = released.wait_for(|r| *r) => {}
            _ = tokio::time::sleep_until(self.deadline) => {}
        }
    }
}

impl ScopeRelease {
    /// Release the scope. Safe to call any number of times.
    pub fn release(&self) {
        if !self.released.send_replace(true) {
            trace!("deadline scope released");
        }
    }

    pub fn is_released(&self) -> bool {
        *self.released.borrow()
    }
}

impl Drop for ScopeRelease {
    fn drop(&mut self) {
        self.release();
    }
}
