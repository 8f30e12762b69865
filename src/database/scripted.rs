//! Scripted database collaborator.
//!
//! Stands in for a real driver in tests and dry runs. Each stage (connect,
//! ping, disconnect) follows a [`Step`], and every call is counted so callers
//! can assert which collaborator methods were used.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::database::{DatabaseConnector, DatabaseError, DatabaseHandle};

/// How a scripted stage behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Succeed,
    Fail,
    /// Never completes; only a deadline or teardown ends it.
    Hang,
}

impl Step {
    async fn perform(self, stage: &str) -> Result<(), DatabaseError> {
        match self {
            Step::Succeed => Ok(()),
            Step::Fail => Err(DatabaseError::Driver(format!("scripted {stage} failure"))),
            Step::Hang => std::future::pending().await,
        }
    }
}

#[derive(Debug, Default)]
struct Calls {
    connects: AtomicUsize,
    pings: AtomicUsize,
    disconnects: AtomicUsize,
}

/// Connector whose behavior is fixed up front.
#[derive(Debug, Clone)]
pub struct ScriptedConnector {
    connect: Step,
    ping: Step,
    disconnect: Step,
    calls: Arc<Calls>,
}

impl ScriptedConnector {
    /// Every stage succeeds.
    pub fn healthy() -> Self {
        Self::new(Step::Succeed, Step::Succeed)
    }

    pub fn new(connect: Step, ping: Step) -> Self {
        Self {
            connect,
            ping,
            disconnect: Step::Succeed,
            calls: Arc::default(),
        }
    }

    /// Override how `disconnect` behaves.
    pub fn with_disconnect(mut self, disconnect: Step) -> Self {
        self.disconnect = disconnect;
        self
    }

    pub fn connects(&self) -> usize {
        self.calls.connects.load(Ordering::SeqCst)
    }

    pub fn pings(&self) -> usize {
        self.calls.pings.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.calls.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseConnector for ScriptedConnector {
    type Handle = ScriptedHandle;

    async fn connect(&self, uri: &str, _timeout: Duration) -> Result<ScriptedHandle, DatabaseError> {
        self.calls.connects.fetch_add(1, Ordering::SeqCst);
        if uri.trim().is_empty() {
            return Err(DatabaseError::InvalidUri("empty connection string".to_string()));
        }
        self.connect.perform("connect").await?;
        Ok(ScriptedHandle {
            ping: self.ping,
            disconnect: self.disconnect,
            calls: Arc::clone(&self.calls),
        })
    }
}

/// Handle produced by [`ScriptedConnector`].
#[derive(Debug)]
pub struct ScriptedHandle {
    ping: Step,
    disconnect: Step,
    calls: Arc<Calls>,
}

#[async_trait]
impl DatabaseHandle for ScriptedHandle {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.calls.pings.fetch_add(1, Ordering::SeqCst);
        self.ping.perform("ping").await
    }

    async fn disconnect(&self) -> Result<(), DatabaseError> {
        self.calls.disconnects.fetch_add(1, Ordering::SeqCst);
        self.disconnect.perform("disconnect").await
    }
}
