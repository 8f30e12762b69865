//! Metrics collection.
//!
//! # Responsibilities
//! - Define lifecycle metrics (sessions, containers, log flushes)
//! - Record through the `metrics` facade; the host installs a recorder
//!
//! # Metrics
//! - `feed_context_sessions_total` (counter): sessions successfully opened
//! - `feed_context_session_failures_total` (counter): failed opens by stage
//! - `feed_context_sessions_closed_total` (counter): closes, by whether disconnect ran
//! - `feed_context_containers_created_total` (counter): containers created at startup
//! - `feed_context_log_flushes_total` (counter): log uploads by outcome
//!
//! # Design Decisions
//! - No exporter here: without a recorder every call is a no-op
//! - Labels are static strings to keep cardinality fixed

use metrics::{counter, describe_counter};

pub const SESSIONS_TOTAL: &str = "feed_context_sessions_total";
pub const SESSION_FAILURES_TOTAL: &str = "feed_context_session_failures_total";
pub const SESSIONS_CLOSED_TOTAL: &str = "feed_context_sessions_closed_total";
pub const CONTAINERS_CREATED_TOTAL: &str = "feed_context_containers_created_total";
pub const LOG_FLUSHES_TOTAL: &str = "feed_context_log_flushes_total";

/// Register descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(SESSIONS_TOTAL, "Database sessions successfully opened");
    describe_counter!(
        SESSION_FAILURES_TOTAL,
        "Database session opens that failed, by stage (connect, ping)"
    );
    describe_counter!(
        SESSIONS_CLOSED_TOTAL,
        "Database sessions closed, by whether a disconnect was issued"
    );
    describe_counter!(
        CONTAINERS_CREATED_TOTAL,
        "Storage containers created during initialization"
    );
    describe_counter!(LOG_FLUSHES_TOTAL, "Topic log uploads, by outcome");
}

pub fn record_session_opened() {
    counter!(SESSIONS_TOTAL).increment(1);
}

pub fn record_session_failure(stage: &'static str) {
    counter!(SESSION_FAILURES_TOTAL, "stage" => stage).increment(1);
}

pub fn record_session_closed(disconnected: bool) {
    let mode = if disconnected { "disconnect" } else { "expired" };
    counter!(SESSIONS_CLOSED_TOTAL, "mode" => mode).increment(1);
}

pub fn record_container_created(container: &str) {
    counter!(CONTAINERS_CREATED_TOTAL, "container" => container.to_string()).increment(1);
}

pub fn record_log_flush(outcome: &'static str) {
    counter!(LOG_FLUSHES_TOTAL, "outcome" => outcome).increment(1);
}
