//! Deadline-bounded database sessions.
//!
//! # Responsibilities
//! - Connect and ping within one deadline
//! - Release a half-open connection when the ping fails
//! - Close idempotently, skipping disconnect once the deadline has passed
//!
//! # Design Decisions
//! - The deadline is fixed at open time and doubles as the session lifetime
//! - Context teardown counts as expiry
//! - Close never fails; disconnect errors are logged

use std::time::Duration;

use uuid::Uuid;

use crate::database::{
    DatabaseConnector, DatabaseError, DatabaseHandle, DatabaseSettings, SessionError,
};
use crate::lifecycle::deadline::Deadline;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::observability::metrics;

/// A time-bounded database connection owned by one unit of work.
///
/// `Session::default()` is a session that was never opened; closing it is a
/// no-op.
#[derive(Debug)]
pub struct Session<H: DatabaseHandle> {
    id: Uuid,
    handle: Option<H>,
    deadline: Deadline,
    signal: ShutdownSignal,
}

impl<H: DatabaseHandle> Default for Session<H> {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            handle: None,
            deadline: Deadline::after(Duration::ZERO),
            signal: ShutdownSignal::never(),
        }
    }
}

impl<H: DatabaseHandle> Session<H> {
    /// Connect and ping, both bounded by `settings.timeout`.
    ///
    /// Connect failures (including the deadline elapsing) map to
    /// [`SessionError::Connect`]; ping failures to
    /// [`SessionError::Unreachable`]. Teardown of the owning context aborts
    /// whichever stage is running.
    pub async fn open<C>(
        connector: &C,
        settings: &DatabaseSettings,
        mut signal: ShutdownSignal,
    ) -> Result<Self, SessionError>
    where
        C: DatabaseConnector<Handle = H>,
    {
        let id = Uuid::new_v4();
        let deadline = Deadline::after(settings.timeout);

        if signal.is_triggered() {
            metrics::record_session_failure("connect");
            return Err(SessionError::Connect(DatabaseError::Cancelled));
        }

        let connected = tokio::select! {
            result = deadline.run(connector.connect(&settings.uri, settings.timeout)) => {
                result.unwrap_or(Err(DatabaseError::Timeout(settings.timeout)))
            }
            _ = signal.triggered() => Err(DatabaseError::Cancelled),
        };
        let handle = match connected {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "Database connect failed");
                metrics::record_session_failure("connect");
                return Err(SessionError::Connect(e));
            }
        };

        let pinged = tokio::select! {
            result = deadline.run(handle.ping()) => {
                result.unwrap_or(Err(DatabaseError::Timeout(settings.timeout)))
            }
            _ = signal.triggered() => Err(DatabaseError::Cancelled),
        };
        if let Err(e) = pinged {
            tracing::warn!(session_id = %id, error = %e, "Database ping failed");
            metrics::record_session_failure("ping");
            if !deadline.is_expired() && !signal.is_triggered() {
                if let Ok(Err(disconnect_err)) = deadline.run(handle.disconnect()).await {
                    tracing::debug!(session_id = %id, error = %disconnect_err, "Disconnect after failed ping");
                }
            }
            return Err(SessionError::Unreachable(e));
        }

        tracing::info!(
            session_id = %id,
            timeout_ms = settings.timeout.as_millis() as u64,
            "Database session opened"
        );
        metrics::record_session_opened();

        Ok(Self {
            id,
            handle: Some(handle),
            deadline,
            signal,
        })
    }

    /// Session identifier used in log fields. Nil for unopened sessions.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the session holds a handle (it may still be expired).
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Deadline passed or owning context torn down.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_expired() || self.signal.is_triggered()
    }

    /// Time left before the session expires.
    pub fn remaining(&self) -> Duration {
        if self.signal.is_triggered() {
            Duration::ZERO
        } else {
            self.deadline.remaining()
        }
    }

    /// The live handle, if the session is open and not expired.
    pub fn handle(&self) -> Option<&H> {
        if self.is_expired() {
            return None;
        }
        self.handle.as_ref()
    }

    /// Close the session. Never fails and may be called any number of times.
    ///
    /// An expired session is released without calling disconnect.
    pub async fn close(&mut self) {
        let expired = self.is_expired();
        let Some(handle) = self.handle.take() else {
            return;
        };

        let disconnected = if expired {
            tracing::debug!(session_id = %self.id, "Session expired, skipping disconnect");
            false
        } else {
            match self.deadline.run(handle.disconnect()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(session_id = %self.id, error = %e, "Database disconnect failed");
                }
                Err(_) => {
                    tracing::warn!(session_id = %self.id, "Database disconnect timed out");
                }
            }
            true
        };

        self.signal = ShutdownSignal::never();
        metrics::record_session_closed(disconnected);
        tracing::info!(session_id = %self.id, disconnected, "Database session closed");
    }
}

impl<H: DatabaseHandle> Drop for Session<H> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            tracing::warn!(session_id = %self.id, "Session dropped without close; handle released");
        }
    }
}
