/// Media object storage client (S3-compatible).
///
/// Uploads are an external collaborator's concern; the core only deletes
/// objects that would otherwise be orphaned by post deletion or avatar
/// replacement.
use std::sync::Arc;

use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::Client;

use crate::config::MediaConfig;
use crate::error::{AppError, Result};

/// Shared handle registered as app data; `None` disables cleanup entirely
/// (local development without an object store).
pub type SharedStorage = Option<Arc<MediaStorage>>;

pub struct MediaStorage {
    client: Client,
    bucket: String,
}

impl MediaStorage {
    /// Build an S3 client from the provided configuration.
    pub async fn connect(config: &MediaConfig) -> Result<Self> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "social-api",
        );

        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &config.endpoint {
            if !endpoint.trim().is_empty() {
                builder = builder.endpoint_url(endpoint);
            }
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }

    /// Delete a stored object by key.
    pub async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete media object: {e}")))?;

        Ok(())
    }
}

/// Fire-and-forget cleanup of a stored object. Failures are logged and
/// swallowed: an orphaned object never fails the request that caused it.
pub fn schedule_object_cleanup(storage: &SharedStorage, key: Option<String>) {
    let Some(key) = key else { return };

    match storage {
        Some(storage) => {
            let storage = storage.clone();
            tokio::spawn(async move {
                if let Err(err) = storage.delete_object(&key).await {
                    tracing::warn!(%key, "media object cleanup failed: {err}");
                }
            });
        }
        None => {
            tracing::debug!(%key, "media storage not configured; skipping object cleanup");
        }
    }
}
