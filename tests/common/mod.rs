//! Shared fixtures for integration tests.

use std::io::Write;

use feed_context::config::{AppConfig, ObservabilityConfig, SourceConfig, StorageConfig};

/// Options file in the on-disk JSON format.
pub fn options_json(database: &str, max_results: i64, timeout_secs: u64) -> String {
    format!(
        r#"{{
    "source": {{
        "countries-url": "https://feeds.example.org/countries.csv",
        "regions-url": "https://feeds.example.org/regions.csv",
        "airports-url": "https://feeds.example.org/airports.csv",
        "runways-url": "https://feeds.example.org/runways.csv",
        "frequencies-url": "https://feeds.example.org/airport-frequencies.csv"
    }},
    "storage": {{ "server": "localhost:9000", "key": "minio", "secret": "minio123" }},
    "database": "{database}",
    "max-results": {max_results},
    "database-timeout-secs": {timeout_secs}
}}"#
    )
}

/// Write `content` to a temporary `.json` file.
pub fn write_options(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("options")
        .suffix(".json")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// In-memory config matching [`options_json`].
#[allow(dead_code)]
pub fn app_config(database: &str, max_results: i64, timeout_secs: u64) -> AppConfig {
    AppConfig {
        source: SourceConfig {
            countries_url: "https://feeds.example.org/countries.csv".into(),
            regions_url: "https://feeds.example.org/regions.csv".into(),
            airports_url: "https://feeds.example.org/airports.csv".into(),
            runways_url: "https://feeds.example.org/runways.csv".into(),
            frequencies_url: Some("https://feeds.example.org/airport-frequencies.csv".into()),
        },
        storage: StorageConfig {
            server: "localhost:9000".into(),
            key: "minio".into(),
            secret: "minio123".into(),
            region: "us-east-1".into(),
            secure: false,
        },
        database: database.into(),
        max_results,
        database_timeout_secs: timeout_secs,
        observability: ObservabilityConfig::default(),
    }
}
