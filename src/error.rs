//! Crate-wide error type.
//!
//! Each subsystem reports its own error; this enum lets a binary hold any of
//! them behind one `?`.

use thiserror::Error;

use crate::config::ConfigError;
use crate::database::SessionError;
use crate::lifecycle::InitError;
use crate::observability::LogFlushError;
use crate::storage::StorageError;

/// Result type alias for context operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    LogFlush(#[from] LogFlushError),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Init(InitError::Config(err))
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Init(InitError::StorageConnect(err))
    }
}

impl Error {
    /// Whether the error must stop the process rather than one operation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Session(_))
    }
}
