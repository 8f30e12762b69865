//! Configuration schema definitions.
//!
//! This module defines the options file read at startup. All types derive
//! Serde traits; keys are kebab-case (`countries-url`, `max-results`).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default region used when creating storage containers.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default bound on database connect + ping, and on session lifetime.
pub const DEFAULT_DATABASE_TIMEOUT_SECS: u64 = 10;

/// Root configuration record.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    /// Source feed locations.
    pub source: SourceConfig,

    /// Object-storage endpoint and credentials.
    pub storage: StorageConfig,

    /// Database connection string (e.g. `mongodb://host:27017`).
    pub database: String,

    /// Upper bound on results returned by queries.
    pub max_results: i64,

    /// Seconds allowed for connecting a database session; also its lifetime.
    #[serde(default = "default_database_timeout_secs")]
    pub database_timeout_secs: u64,

    /// Logging settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Session bound as a `Duration`.
    pub fn database_timeout(&self) -> Duration {
        Duration::from_secs(self.database_timeout_secs)
    }
}

fn default_database_timeout_secs() -> u64 {
    DEFAULT_DATABASE_TIMEOUT_SECS
}

/// Source feed URLs.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    pub countries_url: String,
    pub regions_url: String,
    pub airports_url: String,
    pub runways_url: String,

    /// Radio frequencies feed; older option files omit it.
    #[serde(default)]
    pub frequencies_url: Option<String>,
}

/// Object-storage connection settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Endpoint (`host:port`, or `file:///path` for the local backend).
    pub server: String,

    /// Access key.
    pub key: String,

    /// Secret key.
    pub secret: String,

    /// Region used when a container has to be created.
    #[serde(default = "default_region")]
    pub region: String,

    /// Use TLS towards the endpoint.
    #[serde(default)]
    pub secure: bool,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
