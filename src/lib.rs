//! Application context for feed loaders.
//!
//! Loads the options file, connects object storage, opens short-lived
//! database sessions per unit of work and flushes topic logs to storage.

pub mod config;
pub mod database;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod storage;

pub use config::AppConfig;
pub use database::{Session, SessionError};
pub use error::{Error, Result};
pub use lifecycle::{AppContext, InitError};
pub use observability::{LogFlushError, LogSink};
pub use storage::{ObjectStore, StorageError};
