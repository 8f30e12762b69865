//! MongoDB collaborator.
//!
//! Connects in direct mode (no replica-set discovery) and pings the `admin`
//! database for liveness.

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;

use crate::database::{DatabaseConnector, DatabaseError, DatabaseHandle};

/// Connector building a fresh `mongodb::Client` per session.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoConnector;

#[async_trait]
impl DatabaseConnector for MongoConnector {
    type Handle = MongoHandle;

    async fn connect(&self, uri: &str, timeout: Duration) -> Result<MongoHandle, DatabaseError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| DatabaseError::InvalidUri(e.to_string()))?;
        options.direct_connection = Some(true);
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client =
            Client::with_options(options).map_err(|e| DatabaseError::Driver(e.to_string()))?;
        Ok(MongoHandle { client })
    }
}

/// A connected MongoDB client.
#[derive(Debug, Clone)]
pub struct MongoHandle {
    client: Client,
}

impl MongoHandle {
    /// The driver client, for running queries inside a session.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl DatabaseHandle for MongoHandle {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Driver(e.to_string()))
    }

    async fn disconnect(&self) -> Result<(), DatabaseError> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}
