//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Connect object storage
//! - Ensure the `csv` and `log` containers exist
//! - Hand back a ready `AppContext`
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal to the caller
//! - Steps run in order, not concurrently
//! - The database is not touched here; sessions are opened per unit of work

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{load_config, ConfigError, StorageConfig};
use crate::lifecycle::context::AppContext;
use crate::observability::metrics;
use crate::storage::{
    ensure_container, ObjectStore, ObjectStoreConnector, StorageError, REQUIRED_CONTAINERS,
};

/// Errors that abort initialization.
#[derive(Debug, Error)]
pub enum InitError {
    /// Options file missing, malformed or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Object storage unreachable, or container setup failed.
    #[error("object storage unavailable: {0}")]
    StorageConnect(#[from] StorageError),
}

/// Read the options file at `path` and build the context from it.
pub async fn initialize<C>(path: &Path, connector: &C) -> Result<AppContext, InitError>
where
    C: ObjectStoreConnector + ?Sized,
{
    let config = load_config(path)?;
    tracing::info!(path = %path.display(), "Configuration loaded");
    AppContext::from_config(&config, connector).await
}

/// Connect object storage and make sure every required container exists.
pub async fn connect_storage<C>(
    config: &StorageConfig,
    connector: &C,
) -> Result<Arc<dyn ObjectStore>, StorageError>
where
    C: ObjectStoreConnector + ?Sized,
{
    let store = connector.connect(config).await?;
    tracing::info!(server = %config.server, secure = config.secure, "Object storage connected");

    for container in REQUIRED_CONTAINERS {
        if ensure_container(store.as_ref(), container, &config.region).await? {
            metrics::record_container_created(container);
        }
    }

    Ok(store)
}
