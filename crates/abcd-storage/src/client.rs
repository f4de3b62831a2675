//! S3-compatible store client.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::store::{BlobStore, ObjectInfo, PutPrecondition};

/// Configuration for the S3-compatible client.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// S3 API endpoint URL
    pub endpoint_url: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket name
    pub bucket_name: String,
    /// Region ("auto" for interoperability endpoints)
    pub region: String,
    /// Base URL for public object access; defaults to `{endpoint}/{bucket}`
    pub public_base_url: Option<String>,
}

impl StoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            endpoint_url: std::env::var("STORE_ENDPOINT_URL")
                .map_err(|_| StorageError::config_error("STORE_ENDPOINT_URL not set"))?,
            access_key_id: std::env::var("STORE_ACCESS_KEY_ID")
                .map_err(|_| StorageError::config_error("STORE_ACCESS_KEY_ID not set"))?,
            secret_access_key: std::env::var("STORE_SECRET_ACCESS_KEY")
                .map_err(|_| StorageError::config_error("STORE_SECRET_ACCESS_KEY not set"))?,
            bucket_name: std::env::var("STORE_BUCKET_NAME")
                .map_err(|_| StorageError::config_error("STORE_BUCKET_NAME not set"))?,
            region: std::env::var("STORE_REGION").unwrap_or_else(|_| "auto".to_string()),
            public_base_url: std::env::var("STORE_PUBLIC_BASE_URL").ok(),
        })
    }
}

/// Blob store backed by an S3-compatible service.
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3BlobStore {
    /// Create a new client from configuration.
    pub fn new(config: StoreConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "abcd",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let public_base_url = config
            .public_base_url
            .clone()
            .unwrap_or_else(|| {
                format!(
                    "{}/{}",
                    config.endpoint_url.trim_end_matches('/'),
                    config.bucket_name
                )
            });

        Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket_name,
            public_base_url,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self::new(StoreConfig::from_env()?))
    }

    /// Check connectivity by performing a head-bucket operation.
    pub async fn check_connectivity(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StorageError::Sdk(format!("Store connectivity check failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectInfo>> {
        debug!("Listing objects with prefix: {}", prefix);

        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);

            if let Some(token) = continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StorageError::ListFailed(e.to_string()))?;

            if let Some(ref contents) = response.contents {
                for obj in contents {
                    objects.push(ObjectInfo {
                        key: obj.key.clone().unwrap_or_default(),
                        size: obj.size.unwrap_or(0) as u64,
                    });
                }
            }

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token;
            } else {
                break;
            }
        }

        Ok(objects)
    }

    async fn head(&self, key: &str) -> StorageResult<Option<ObjectInfo>> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => Ok(Some(ObjectInfo {
                key: key.to_string(),
                size: response.content_length().unwrap_or(0) as u64,
            })),
            Err(e) => {
                if e.to_string().contains("NotFound") || e.to_string().contains("NoSuchKey") {
                    Ok(None)
                } else {
                    Err(StorageError::Sdk(e.to_string()))
                }
            }
        }
    }

    async fn get_bytes(&self, key: &str) -> StorageResult<Vec<u8>> {
        debug!("Downloading {}", key);

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("NoSuchKey") {
                    StorageError::not_found(key)
                } else {
                    StorageError::DownloadFailed(e.to_string())
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(bytes)
    }

    async fn put_bytes(
        &self,
        key: &str,
        data: Vec<u8>,
        precondition: PutPrecondition,
    ) -> StorageResult<()> {
        debug!("Uploading {} bytes to {}", data.len(), key);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));

        if precondition == PutPrecondition::IfNotExists {
            request = request.if_none_match("*");
        }

        request.send().await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("PreconditionFailed") || msg.contains("412") {
                StorageError::precondition_failed(key)
            } else {
                StorageError::upload_failed(msg)
            }
        })?;

        info!("Uploaded {}", key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> StorageResult<String> {
        let presign_config = PresigningConfig::expires_in(ttl)
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }
}
