//! Topic logs buffered in memory and flushed to object storage.
//!
//! # Responsibilities
//! - Accumulate timestamped lines for one topic
//! - Optionally capture `tracing` events emitted while the sink is active
//! - Upload the whole buffer as one `text/plain` object on close
//!
//! # Design Decisions
//! - The sink is an explicit value passed to call sites; there is no global
//!   log redirection, so several topics can be logged at once
//! - A failed upload is returned as `LogFlushError`; the caller decides
//!   whether that is fatal
//! - Closing consumes the sink, so the buffer is gone whatever the outcome

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::MakeWriter;

use crate::observability::metrics;
use crate::storage::{ObjectStore, StorageError, LOG_CONTAINER};

/// Content type of flushed logs.
pub const LOG_CONTENT_TYPE: &str = "text/plain";

/// Timestamp format used in blob names; sorts lexically.
pub const BLOB_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

const LINE_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Upload of a buffered log failed.
#[derive(Debug, Error)]
#[error("cannot flush log for topic {topic} as {blob}: {source}")]
pub struct LogFlushError {
    pub topic: String,
    pub blob: String,
    #[source]
    pub source: StorageError,
}

/// Blob name for a topic log flushed at `at`: `<topic>-YYYYMMDD-HHMMSS.txt`.
///
/// Names have one-second resolution. Two logs for the same topic flushed
/// within the same second get the same name, and the later upload replaces
/// the earlier one.
pub fn blob_name(topic: &str, at: NaiveDateTime) -> String {
    format!("{}-{}.txt", topic, at.format(BLOB_TIMESTAMP_FORMAT))
}

/// In-memory log for one topic.
///
/// Clones share the same buffer. Drop any guard returned by
/// [`LogSink::capture`] before calling [`LogSink::close`]; events captured
/// after the flush are discarded.
#[derive(Clone)]
pub struct LogSink {
    topic: Arc<str>,
    buffer: Arc<Mutex<Vec<u8>>>,
    storage: Arc<dyn ObjectStore>,
}

impl LogSink {
    /// Start an empty log for `topic`, flushed to `storage` on close.
    pub fn new(topic: impl Into<String>, storage: Arc<dyn ObjectStore>) -> Self {
        let topic: String = topic.into();
        tracing::debug!(topic = %topic, "Topic log started");
        Self {
            topic: Arc::from(topic),
            buffer: Arc::new(Mutex::new(Vec::new())),
            storage,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `message` as one timestamped line. Empty messages are ignored.
    pub fn write_line(&self, message: &str) {
        if message.is_empty() {
            return;
        }
        let line = format!(
            "{} {}\n",
            Local::now().format(LINE_TIMESTAMP_FORMAT),
            message.trim_end_matches('\n')
        );
        self.lock().extend_from_slice(line.as_bytes());
    }

    /// Append the error's description, if there is one.
    pub fn write_error(&self, err: Option<&dyn std::error::Error>) {
        if let Some(err) = err {
            self.write_line(&err.to_string());
        }
    }

    /// Copy of the buffered bytes.
    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Route `tracing` events on the current thread into this log until the
    /// guard is dropped; afterwards events go back to the process subscriber.
    ///
    /// Captured events carry the same timestamp format as `write_line`.
    pub fn capture(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_timer(ChronoLocal::new(LINE_TIMESTAMP_FORMAT.to_string()))
            .with_writer(self.clone())
            .with_ansi(false)
            .with_target(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Upload the buffer to the `log` container and return the blob name.
    pub async fn close(self) -> Result<String, LogFlushError> {
        let blob = blob_name(&self.topic, Local::now().naive_local());
        let content = std::mem::take(&mut *self.lock());
        let bytes = content.len();

        match self
            .storage
            .put_object(LOG_CONTAINER, &blob, content, LOG_CONTENT_TYPE)
            .await
        {
            Ok(()) => {
                tracing::info!(topic = %self.topic, blob = %blob, bytes, "Topic log flushed");
                metrics::record_log_flush("ok");
                Ok(blob)
            }
            Err(source) => {
                tracing::error!(topic = %self.topic, blob = %blob, error = %source, "Topic log flush failed");
                metrics::record_log_flush("error");
                Err(LogFlushError {
                    topic: self.topic.to_string(),
                    blob,
                    source,
                })
            }
        }
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("topic", &self.topic)
            .field("bytes", &self.len())
            .finish()
    }
}

/// Writer appending to a sink's buffer.
#[derive(Debug)]
pub struct LogWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}
