//! Database session subsystem.
//!
//! # Data Flow
//! ```text
//! AppContext (connection string, timeout)
//!     → DatabaseSettings
//!     → Session::open (connect + ping, both bounded by one deadline)
//!     → caller's unit of work uses Session::handle
//!     → Session::close (disconnect unless the deadline already passed)
//! ```
//!
//! # Design Decisions
//! - Sessions are short-lived and never pooled
//! - One attempt per open; failures go straight back to the caller
//! - The driver is an external collaborator behind `DatabaseConnector`

#[cfg(feature = "mongodb")]
pub mod mongo;
pub mod scripted;
pub mod session;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AppConfig;

#[cfg(feature = "mongodb")]
pub use mongo::{MongoConnector, MongoHandle};
pub use scripted::{ScriptedConnector, Step};
pub use session::Session;

/// Errors reported by a database driver, or by the deadline around it.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The connection string was rejected.
    #[error("invalid connection string: {0}")]
    InvalidUri(String),

    /// The driver reported a failure.
    #[error("driver error: {0}")]
    Driver(String),

    /// The session deadline elapsed first.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The owning context was torn down first.
    #[error("cancelled by context teardown")]
    Cancelled,
}

/// Errors from opening a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Connection setup failed within the deadline.
    #[error("cannot connect to database: {0}")]
    Connect(#[source] DatabaseError),

    /// Connected, but the liveness ping failed.
    #[error("database unreachable: {0}")]
    Unreachable(#[source] DatabaseError),
}

/// What a session needs from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// Connection string.
    pub uri: String,
    /// Bound on connect + ping, and on the session's lifetime.
    pub timeout: Duration,
}

impl DatabaseSettings {
    pub fn new(uri: impl Into<String>, timeout: Duration) -> Self {
        Self {
            uri: uri.into(),
            timeout,
        }
    }
}

impl From<&AppConfig> for DatabaseSettings {
    fn from(config: &AppConfig) -> Self {
        Self::new(config.database.clone(), config.database_timeout())
    }
}

/// A live connection produced by a [`DatabaseConnector`].
#[async_trait]
pub trait DatabaseHandle: Send + Sync + 'static {
    /// Verify the server answers.
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Close the connection.
    async fn disconnect(&self) -> Result<(), DatabaseError>;
}

/// Establishes connections for sessions.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    type Handle: DatabaseHandle;

    /// Connect to `uri`. `timeout` is a hint for driver-level settings; the
    /// session enforces the bound regardless.
    async fn connect(&self, uri: &str, timeout: Duration) -> Result<Self::Handle, DatabaseError>;
}
