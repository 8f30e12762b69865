//! Timeout enforcement.
//!
//! # Responsibilities
//! - Fix an absolute deadline when a session is acquired
//! - Bound connect and ping by the remaining time
//! - Answer whether a session's lifetime has elapsed
//!
//! # Design Decisions
//! - Uses Tokio's clock so paused-time tests are deterministic
//! - Timeout errors are distinct from collaborator errors

use std::future::Future;
use std::time::Duration;

use tokio::time::{error::Elapsed, Instant};

/// An absolute point in time derived from a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// Time left, zero once elapsed.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Run `future` until it completes or the deadline passes.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, Elapsed> {
        tokio::time::timeout_at(self.at, future).await
    }
}
