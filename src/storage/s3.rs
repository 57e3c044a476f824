//! S3 object store implementation.

use super::{ObjectStore, ResultLocation};
use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use tracing::debug;

/// Reads result artifacts from Amazon S3.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Creates a store from an existing S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a store from shared AWS configuration.
    pub fn from_conf(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get_object(&self, location: &ResultLocation) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| {
                DashboardError::retrieval(format!(
                    "Failed to read {location}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| {
                DashboardError::retrieval(format!("Failed to read body of {location}: {e}"))
            })?
            .into_bytes()
            .to_vec();

        debug!("Read {} bytes from {}", data.len(), location);
        Ok(data)
    }
}
