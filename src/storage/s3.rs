//! S3-compatible object store (MinIO, AWS).
//!
//! # Responsibilities
//! - Build an S3 client from the options file (endpoint, key, secret, region)
//! - Map containers to buckets and objects to keys
//!
//! # Design Decisions
//! - Path-style requests, which MinIO expects for `host:port` endpoints
//! - `secure` picks the scheme when the endpoint has none
//! - Building the client does not touch the network; the first bucket check does

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use url::Url;

use crate::config::schema::DEFAULT_REGION;
use crate::config::StorageConfig;
use crate::storage::{ObjectStore, ObjectStoreConnector, StorageError};

const CREDENTIALS_SOURCE: &str = "feed-context-options";

/// Object store backed by an S3 client.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn container_exists(&self, name: &str) -> Result<bool, StorageError> {
        match self.client.head_bucket().bucket(name).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|s| s.is_not_found()) => Ok(false),
            Err(e) => Err(StorageError::ContainerCheck {
                container: name.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            }),
        }
    }

    async fn create_container(&self, name: &str, region: &str) -> Result<(), StorageError> {
        let mut request = self.client.create_bucket().bucket(name);
        // us-east-1 is the implicit location and must not be sent as a constraint.
        if region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        request
            .send()
            .await
            .map(|_| ())
            .map_err(|e| StorageError::ContainerCreate {
                container: name.to_string(),
                region: region.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })
    }

    async fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let bytes = content.len();
        self.client
            .put_object()
            .bucket(container)
            .key(name)
            .body(ByteStream::from(content))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Put {
                container: container.to_string(),
                name: name.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        tracing::debug!(container, name, bytes, content_type, "Object uploaded");
        Ok(())
    }
}

/// Connector for `host:port` or `http(s)://` storage endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct S3Connector;

impl S3Connector {
    /// Endpoint URL for the client. A bare `host:port` gets `https` when
    /// `secure` is set and `http` otherwise.
    pub fn endpoint_url(config: &StorageConfig) -> Result<String, StorageError> {
        let server = config.server.trim();
        let endpoint = if server.contains("://") {
            server.to_string()
        } else {
            let scheme = if config.secure { "https" } else { "http" };
            format!("{scheme}://{server}")
        };

        let url = Url::parse(&endpoint).map_err(|e| StorageError::Connect {
            endpoint: config.server.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(StorageError::Connect {
                endpoint: config.server.clone(),
                reason: "expected host:port or an http(s) URL".to_string(),
            });
        }
        Ok(endpoint)
    }
}

#[async_trait]
impl ObjectStoreConnector for S3Connector {
    async fn connect(&self, config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
        let endpoint = Self::endpoint_url(config)?;
        let credentials = Credentials::new(
            config.key.clone(),
            config.secret.clone(),
            None,
            None,
            CREDENTIALS_SOURCE,
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&endpoint)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        tracing::info!(endpoint = %endpoint, region = %config.region, "S3 client configured");
        Ok(Arc::new(S3ObjectStore::new(Client::from_conf(s3_config))))
    }
}
