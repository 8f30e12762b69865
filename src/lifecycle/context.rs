//! The application context.
//!
//! Bundles the long-lived pieces of a process: the object-storage handle,
//! the feed locations and result limit from the options file, and the
//! database settings used to open per-operation sessions.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::config::{AppConfig, SourceConfig};
use crate::database::{DatabaseConnector, DatabaseSettings, Session, SessionError};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::startup::{self, InitError};
use crate::observability::LogSink;
use crate::storage::{ObjectStore, ObjectStoreConnector};

/// Source feed locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedUrls {
    pub countries: String,
    pub regions: String,
    pub airports: String,
    pub runways: String,
    pub frequencies: Option<String>,
}

impl From<&SourceConfig> for FeedUrls {
    fn from(source: &SourceConfig) -> Self {
        Self {
            countries: source.countries_url.clone(),
            regions: source.regions_url.clone(),
            airports: source.airports_url.clone(),
            runways: source.runways_url.clone(),
            frequencies: source.frequencies_url.clone(),
        }
    }
}

/// Process-wide bundle of configuration and long-lived handles.
pub struct AppContext {
    storage: Arc<dyn ObjectStore>,
    feeds: FeedUrls,
    max_results: i64,
    database: DatabaseSettings,
    shutdown: Shutdown,
}

impl AppContext {
    /// Load the options file at `path`, connect storage, ensure containers.
    pub async fn initialize<C>(path: &Path, connector: &C) -> Result<Self, InitError>
    where
        C: ObjectStoreConnector + ?Sized,
    {
        startup::initialize(path, connector).await
    }

    /// Same as [`AppContext::initialize`] for an already-loaded config.
    pub async fn from_config<C>(config: &AppConfig, connector: &C) -> Result<Self, InitError>
    where
        C: ObjectStoreConnector + ?Sized,
    {
        let storage = startup::connect_storage(&config.storage, connector).await?;

        let context = Self {
            storage,
            feeds: FeedUrls::from(&config.source),
            max_results: config.max_results,
            database: DatabaseSettings::from(config),
            shutdown: Shutdown::new(),
        };

        tracing::info!(
            max_results = context.max_results,
            database_timeout_secs = context.database.timeout.as_secs(),
            "Application context ready"
        );
        Ok(context)
    }

    /// Shared object-storage handle.
    pub fn storage(&self) -> &Arc<dyn ObjectStore> {
        &self.storage
    }

    pub fn feeds(&self) -> &FeedUrls {
        &self.feeds
    }

    /// Upper bound on results returned by queries.
    pub fn max_results(&self) -> i64 {
        self.max_results
    }

    /// Connection string and session bound.
    pub fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    /// Open a database session for one unit of work.
    ///
    /// The session expires when its deadline passes or when this context is
    /// destroyed, whichever comes first.
    pub async fn open_session<C>(&self, connector: &C) -> Result<Session<C::Handle>, SessionError>
    where
        C: DatabaseConnector,
    {
        Session::open(connector, &self.database, self.shutdown.subscribe()).await
    }

    /// Start a topic log flushed to the `log` container.
    pub fn start_log(&self, topic: impl Into<String>) -> LogSink {
        LogSink::new(topic, Arc::clone(&self.storage))
    }

    /// Number of sessions opened from this context and not yet closed.
    pub fn outstanding_sessions(&self) -> usize {
        self.shutdown.receiver_count()
    }

    /// Tear the context down, cancelling the lifetime of any open session.
    pub fn destroy(self) {
        let outstanding = self.outstanding_sessions();
        self.shutdown.trigger();
        if outstanding > 0 {
            tracing::warn!(outstanding, "Context destroyed with open sessions");
        } else {
            tracing::info!("Context destroyed");
        }
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("feeds", &self.feeds)
            .field("max_results", &self.max_results)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}
