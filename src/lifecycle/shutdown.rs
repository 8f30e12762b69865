//! Teardown signalling between the context and its sessions.

use tokio::sync::watch;

/// Coordinator for context teardown.
///
/// Sessions subscribe when they are opened. Triggering the coordinator (or
/// dropping it) cancels every subscribed session's lifetime.
#[derive(Debug)]
pub struct Shutdown {
    /// Watch channel sender; `true` once triggered.
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Trigger the shutdown signal. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Whether `trigger` has been called.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Get the number of live subscribers (sessions not yet released).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half held by a session.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    /// `None` for a signal that never fires.
    rx: Option<watch::Receiver<bool>>,
}

impl ShutdownSignal {
    /// A signal that never fires, for sessions opened outside a context.
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// True once the coordinator was triggered or dropped.
    pub fn is_triggered(&self) -> bool {
        match &self.rx {
            Some(rx) => {
                let triggered = *rx.borrow();
                triggered || rx.has_changed().is_err()
            }
            None => false,
        }
    }

    /// Resolve once the coordinator is triggered or dropped.
    pub async fn triggered(&mut self) {
        match &mut self.rx {
            Some(rx) => {
                // Err means the sender is gone, which counts as teardown too.
                let _ = rx.wait_for(|triggered| *triggered).await;
            }
            None => std::future::pending().await,
        }
    }
}
