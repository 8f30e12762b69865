//! The bootstrap unit of work.
//!
//! Records the feed settings in a topic log, checks the database with one
//! session and flushes the log. The log is flushed even when the session
//! fails, and the failure is written into it first.

use crate::database::DatabaseConnector;
use crate::error::Result;
use crate::lifecycle::context::AppContext;

/// Topic of the log written by [`bootstrap`].
pub const BOOTSTRAP_TOPIC: &str = "bootstrap";

/// Run the bootstrap unit of work and return the flushed blob name.
///
/// A flush failure takes precedence over a session failure, since the
/// session failure is then lost with the log.
pub async fn bootstrap<C>(context: &AppContext, connector: &C) -> Result<String>
where
    C: DatabaseConnector,
{
    let log = context.start_log(BOOTSTRAP_TOPIC);
    let feeds = context.feeds();
    log.write_line(&format!(
        "feeds: countries={} regions={} airports={} runways={}",
        feeds.countries, feeds.regions, feeds.airports, feeds.runways
    ));
    if let Some(frequencies) = &feeds.frequencies {
        log.write_line(&format!("feeds: frequencies={frequencies}"));
    }
    log.write_line(&format!("max-results: {}", context.max_results()));

    let session_outcome = match context.open_session(connector).await {
        Ok(mut session) => {
            log.write_line(&format!(
                "database session {} opened, {}ms left",
                session.id(),
                session.remaining().as_millis()
            ));
            session.close().await;
            log.write_line("database session closed");
            Ok(())
        }
        Err(e) => {
            log.write_error(Some(&e));
            Err(e)
        }
    };

    let blob = log.close().await?;
    session_outcome?;
    Ok(blob)
}
