//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide `tracing` subscriber (stderr)
//! - Pick the level from `RUST_LOG`, falling back to the options file
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Topic logs are separate values (`LogSink`), not a redirect of this one

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(config: &ObservabilityConfig) -> String {
    format!("feed_context={}", config.log_level)
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(config))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
