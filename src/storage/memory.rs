//! In-process object store.
//!
//! Keeps containers and objects in memory. Clones share the same state, so a
//! test can hand one clone to the context and inspect another. Failure
//! switches let callers exercise every error path.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::config::StorageConfig;
use crate::storage::{ObjectStore, ObjectStoreConnector, StorageError};

/// An object as stored by [`MemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Default)]
struct Container {
    region: String,
    objects: BTreeMap<String, StoredObject>,
}

#[derive(Debug, Default)]
struct Inner {
    containers: HashMap<String, Container>,
    containers_created: usize,
    fail_checks: bool,
    fail_creates: bool,
    fail_puts: bool,
}

/// Thread-safe in-memory object store.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every `container_exists` call fail.
    pub fn fail_container_checks(&self, fail: bool) {
        self.lock().fail_checks = fail;
    }

    /// Make every `create_container` call fail.
    pub fn fail_container_creates(&self, fail: bool) {
        self.lock().fail_creates = fail;
    }

    /// Make every `put_object` call fail.
    pub fn fail_puts(&self, fail: bool) {
        self.lock().fail_puts = fail;
    }

    /// Number of successful `create_container` calls so far.
    pub fn containers_created(&self) -> usize {
        self.lock().containers_created
    }

    /// Region a container was created in, if it exists.
    pub fn container_region(&self, container: &str) -> Option<String> {
        self.lock().containers.get(container).map(|c| c.region.clone())
    }

    /// Fetch a stored object.
    pub fn object(&self, container: &str, name: &str) -> Option<StoredObject> {
        self.lock()
            .containers
            .get(container)
            .and_then(|c| c.objects.get(name).cloned())
    }

    /// Names of all objects in a container, sorted.
    pub fn object_names(&self, container: &str) -> Vec<String> {
        self.lock()
            .containers
            .get(container)
            .map(|c| c.objects.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn container_exists(&self, name: &str) -> Result<bool, StorageError> {
        let inner = self.lock();
        if inner.fail_checks {
            return Err(StorageError::ContainerCheck {
                container: name.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(inner.containers.contains_key(name))
    }

    async fn create_container(&self, name: &str, region: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_creates {
            return Err(StorageError::ContainerCreate {
                container: name.to_string(),
                region: region.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        if inner.containers.contains_key(name) {
            return Err(StorageError::ContainerCreate {
                container: name.to_string(),
                region: region.to_string(),
                reason: "container already exists".to_string(),
            });
        }
        inner.containers.insert(
            name.to_string(),
            Container {
                region: region.to_string(),
                objects: BTreeMap::new(),
            },
        );
        inner.containers_created += 1;
        Ok(())
    }

    async fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let mut inner = self.lock();
        let fail = inner.fail_puts;
        let put_error = |reason: &str| StorageError::Put {
            container: container.to_string(),
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if fail {
            return Err(put_error("injected failure"));
        }
        let Some(target) = inner.containers.get_mut(container) else {
            return Err(put_error("no such container"));
        };
        target.objects.insert(
            name.to_string(),
            StoredObject {
                content,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

/// Connector handing out clones of one shared [`MemoryObjectStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    store: MemoryObjectStore,
    refuse: Arc<AtomicBool>,
}

impl MemoryConnector {
    /// Connector over an existing store.
    pub fn new(store: MemoryObjectStore) -> Self {
        Self {
            store,
            refuse: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The shared backing store.
    pub fn store(&self) -> &MemoryObjectStore {
        &self.store
    }

    /// Make `connect` fail, as an unreachable endpoint would.
    pub fn refuse_connections(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStoreConnector for MemoryConnector {
    async fn connect(&self, config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(StorageError::Connect {
                endpoint: config.server.clone(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(Arc::new(self.store.clone()))
    }
}
