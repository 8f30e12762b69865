//! Object-storage subsystem.
//!
//! # Data Flow
//! ```text
//! StorageConfig (endpoint, key, secret)
//!     → ObjectStoreConnector::connect
//!     → Arc<dyn ObjectStore> held by the AppContext
//!     → ensure "csv" and "log" containers at startup
//!     → put_object for log flushes and feed uploads
//! ```
//!
//! # Design Decisions
//! - The client library is an external collaborator behind a trait
//! - `host:port` endpoints go to S3/MinIO, `file://` endpoints to a directory
//! - One long-lived handle per process, shared read-mostly via Arc
//! - No retries: a failed call is reported to the caller as-is

pub mod local;
pub mod memory;
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StorageConfig;

pub use local::{LocalConnector, LocalObjectStore};
pub use memory::{MemoryConnector, MemoryObjectStore};
pub use s3::{S3Connector, S3ObjectStore};

/// Container holding downloaded feed files.
pub const CSV_CONTAINER: &str = "csv";

/// Container holding flushed topic logs.
pub const LOG_CONTAINER: &str = "log";

/// Containers that must exist before the context is usable.
pub const REQUIRED_CONTAINERS: [&str; 2] = [CSV_CONTAINER, LOG_CONTAINER];

/// Errors reported by object-storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection could not be established.
    #[error("cannot connect to object storage at {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    /// Existence check for a container failed.
    #[error("cannot check container {container}: {reason}")]
    ContainerCheck { container: String, reason: String },

    /// Container creation failed.
    #[error("cannot create container {container} in {region}: {reason}")]
    ContainerCreate {
        container: String,
        region: String,
        reason: String,
    },

    /// Object upload failed.
    #[error("cannot store {container}/{name}: {reason}")]
    Put {
        container: String,
        name: String,
        reason: String,
    },
}

/// Capabilities the application needs from an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether the named container exists.
    async fn container_exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Create a container in the given region.
    async fn create_container(&self, name: &str, region: &str) -> Result<(), StorageError>;

    /// Store `content` as a single object, replacing any previous one.
    async fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

/// Opens an object-store handle from configuration.
#[async_trait]
pub trait ObjectStoreConnector: Send + Sync {
    async fn connect(&self, config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError>;
}

/// Backend chosen from the configured endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Directory tree behind a `file://` endpoint.
    Local,
    /// S3-compatible service (MinIO, AWS) behind `host:port` or `http(s)://`.
    S3,
}

impl StorageBackend {
    pub fn for_endpoint(server: &str) -> Self {
        if server.trim_start().starts_with("file://") {
            StorageBackend::Local
        } else {
            StorageBackend::S3
        }
    }
}

#[async_trait]
impl ObjectStoreConnector for StorageBackend {
    async fn connect(&self, config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
        match self {
            StorageBackend::Local => LocalConnector.connect(config).await,
            StorageBackend::S3 => S3Connector.connect(config).await,
        }
    }
}

/// Make sure `container` exists, creating it in `region` when missing.
///
/// Returns `true` when the container had to be created.
pub async fn ensure_container(
    store: &dyn ObjectStore,
    container: &str,
    region: &str,
) -> Result<bool, StorageError> {
    if store.container_exists(container).await? {
        tracing::debug!(container, "Container present");
        return Ok(false);
    }

    store.create_container(container, region).await?;
    tracing::info!(container, region, "Container created");
    Ok(true)
}
