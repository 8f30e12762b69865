//! Feed context bootstrap.
//!
//! Brings the application context up, runs one bootstrap unit of work and
//! tears everything down again.
//!
//! # Architecture Overview
//!
//! ```text
//!   options.json ──▶ config ──▶ lifecycle::startup ──▶ AppContext
//!                                   │                      │
//!                                   ▼                      │ open_session
//!                          object storage                  ▼
//!                          ensure csv + log          database::Session
//!                                   ▲                 (10s deadline)
//!                                   │                      │
//!                                   └──── LogSink::close ◀─┘
//!                                        <topic>-<ts>.txt
//! ```
//!
//! The options file path comes from `FEED_CONTEXT_CONFIG` and defaults to
//! `options.json` in the working directory. `host:port` storage endpoints
//! are S3/MinIO; `file://` endpoints are local directories.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use feed_context::config::{load_config, ObservabilityConfig, DEFAULT_CONFIG_PATH};
use feed_context::database::MongoConnector;
use feed_context::lifecycle::bootstrap;
use feed_context::observability::{init_logging, metrics};
use feed_context::storage::StorageBackend;
use feed_context::AppContext;

const CONFIG_ENV: &str = "FEED_CONTEXT_CONFIG";

#[tokio::main]
async fn main() -> ExitCode {
    let path = env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            tracing::error!(path = %path.display(), error = %e, "Cannot load options");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability);
    metrics::describe_metrics();
    tracing::info!("feed-context v0.1.0 starting");

    let backend = StorageBackend::for_endpoint(&config.storage.server);
    let context = match AppContext::from_config(&config, &backend).await {
        Ok(context) => context,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let outcome = bootstrap(&context, &MongoConnector).await;
    context.destroy();

    match outcome {
        Ok(blob) => {
            tracing::info!(blob = %blob, "Bootstrap complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, fatal = e.is_fatal(), "Bootstrap failed");
            ExitCode::FAILURE
        }
    }
}
