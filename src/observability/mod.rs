//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events → stderr)
//!     → metrics.rs (counters through the metrics facade)
//!
//! Units of work additionally produce:
//!     → log_sink.rs (topic log buffered in memory)
//!     → flushed as <topic>-<timestamp>.txt into the "log" container
//! ```
//!
//! # Design Decisions
//! - Structured fields (session_id, topic, container) on every event
//! - Topic logs are explicit values handed to call sites
//! - Metrics are cheap no-ops until a recorder is installed

pub mod log_sink;
pub mod logging;
pub mod metrics;

pub use log_sink::{blob_name, LogFlushError, LogSink};
pub use logging::init_logging;
