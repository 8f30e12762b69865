//! Filesystem-backed object store.
//!
//! # Responsibilities
//! - Map containers to directories under a root
//! - Write objects through `object_store`'s `LocalFileSystem`
//! - Accept `file://` endpoints from the options file
//!
//! # Design Decisions
//! - Regions and credentials have no meaning locally and are ignored
//! - Object and container names may not contain path separators
//! - Content types are not persisted

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore as _;
use url::Url;

use crate::config::StorageConfig;
use crate::storage::{ObjectStore, ObjectStoreConnector, StorageError};

/// Object store rooted at a local directory.
#[derive(Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    files: LocalFileSystem,
}

impl LocalObjectStore {
    /// Store rooted at `root`, which must be an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let files = LocalFileSystem::new_with_prefix(&root).map_err(|e| StorageError::Connect {
            endpoint: root.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { root, files })
    }

    fn container_path(&self, container: &str) -> Option<PathBuf> {
        is_plain_name(container).then(|| self.root.join(container))
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

async fn is_dir(path: &Path) -> std::io::Result<bool> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn container_exists(&self, name: &str) -> Result<bool, StorageError> {
        let check_error = |reason: String| StorageError::ContainerCheck {
            container: name.to_string(),
            reason,
        };

        let path = self
            .container_path(name)
            .ok_or_else(|| check_error("invalid container name".to_string()))?;

        is_dir(&path).await.map_err(|e| check_error(e.to_string()))
    }

    async fn create_container(&self, name: &str, region: &str) -> Result<(), StorageError> {
        let create_error = |reason: String| StorageError::ContainerCreate {
            container: name.to_string(),
            region: region.to_string(),
            reason,
        };

        let path = self
            .container_path(name)
            .ok_or_else(|| create_error("invalid container name".to_string()))?;

        tokio::fs::create_dir(&path)
            .await
            .map_err(|e| create_error(e.to_string()))
    }

    async fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let put_error = |reason: String| StorageError::Put {
            container: container.to_string(),
            name: name.to_string(),
            reason,
        };

        let dir = self
            .container_path(container)
            .ok_or_else(|| put_error("invalid container name".to_string()))?;
        if !is_plain_name(name) {
            return Err(put_error("invalid object name".to_string()));
        }
        // LocalFileSystem creates parent directories; a missing container is an error here.
        if !is_dir(&dir).await.map_err(|e| put_error(e.to_string()))? {
            return Err(put_error("no such container".to_string()));
        }

        let location = ObjectPath::parse(format!("{container}/{name}"))
            .map_err(|e| put_error(e.to_string()))?;
        let bytes = content.len();
        self.files
            .put(&location, content.into())
            .await
            .map_err(|e| put_error(e.to_string()))?;

        tracing::debug!(%location, bytes, content_type, "Object written");
        Ok(())
    }
}

/// Connector for `file://` storage endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalConnector;

impl LocalConnector {
    fn root_for(endpoint: &str) -> Option<PathBuf> {
        let url = Url::parse(endpoint).ok()?;
        if url.scheme() != "file" {
            return None;
        }
        url.to_file_path().ok()
    }
}

#[async_trait]
impl ObjectStoreConnector for LocalConnector {
    async fn connect(&self, config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
        let connect_error = |reason: String| StorageError::Connect {
            endpoint: config.server.clone(),
            reason,
        };

        let root = Self::root_for(&config.server)
            .ok_or_else(|| connect_error("expected a file:// endpoint".to_string()))?;

        if !is_dir(&root).await.map_err(|e| connect_error(e.to_string()))? {
            return Err(connect_error(format!("{} is not a directory", root.display())));
        }

        let store = LocalObjectStore::new(&root)?;
        tracing::info!(root = %root.display(), "Local object store connected");
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_config(server: String) -> StorageConfig {
        StorageConfig {
            server,
            key: "ignored".into(),
            secret: "ignored".into(),
            region: "us-east-1".into(),
            secure: false,
        }
    }

    #[tokio::test]
    async fn test_container_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path()).unwrap();

        assert!(!store.container_exists("log").await.unwrap());
        store.create_container("log", "us-east-1").await.unwrap();
        assert!(store.container_exists("log").await.unwrap());

        store
            .put_object("log", "topic.txt", b"line\n".to_vec(), "text/plain")
            .await
            .unwrap();
        let written = std::fs::read(dir.path().join("log").join("topic.txt")).unwrap();
        assert_eq!(written, b"line\n");
    }

    #[tokio::test]
    async fn test_put_into_missing_container_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path()).unwrap();

        let err = store
            .put_object("log", "topic.txt", b"x".to_vec(), "text/plain")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no such container"));
        assert!(!dir.path().join("log").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path()).unwrap();
        store.create_container("log", "us-east-1").await.unwrap();

        let err = store
            .put_object("log", "../escape.txt", Vec::new(), "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Put { .. }));
        assert!(store.container_exists("..").await.is_err());
    }

    #[tokio::test]
    async fn test_connector_accepts_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_directory_path(dir.path()).unwrap();

        let store = LocalConnector
            .connect(&storage_config(url.to_string()))
            .await
            .unwrap();
        store.create_container("csv", "us-east-1").await.unwrap();
        assert!(dir.path().join("csv").is_dir());
    }

    #[tokio::test]
    async fn test_connector_rejects_remote_endpoint() {
        let result = LocalConnector
            .connect(&storage_config("localhost:9000".into()))
            .await;
        assert!(matches!(result, Err(StorageError::Connect { .. })));
    }

    #[tokio::test]
    async fn test_connector_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Url::from_directory_path(dir.path().join("absent")).unwrap();
        let result = LocalConnector
            .connect(&storage_config(missing.to_string()))
            .await;
        assert!(matches!(result, Err(StorageError::Connect { .. })));
    }
}
