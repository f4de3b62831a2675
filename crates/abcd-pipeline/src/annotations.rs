//! Gateway to per-video annotation bundles.
//!
//! The annotation-generation subsystem writes one JSON document per channel
//! under `{brand}/annotations/{video_stem}/`. Channels are optional: a
//! missing document leaves that channel empty, and a video with no
//! annotations folder at all yields an all-empty bundle.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use abcd_models::{AnnotationBundle, AnnotationChannel};
use abcd_storage::{BlobStore, StorageError};

use crate::error::{PipelineError, PipelineResult};
use crate::retry::{retry_async, RetryConfig};

/// Source of annotation bundles for the pipeline.
#[async_trait]
pub trait AnnotationGateway: Send + Sync {
    async fn fetch(&self, brand: &str, video_stem: &str) -> PipelineResult<AnnotationBundle>;
}

/// Gateway reading channel documents from the blob store.
pub struct StoreAnnotationGateway {
    store: Arc<dyn BlobStore>,
}

impl StoreAnnotationGateway {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    fn channel_key(brand: &str, video_stem: &str, channel: AnnotationChannel) -> String {
        format!(
            "{}/annotations/{}/{}.json",
            brand,
            video_stem,
            channel.file_stem()
        )
    }
}

#[async_trait]
impl AnnotationGateway for StoreAnnotationGateway {
    async fn fetch(&self, brand: &str, video_stem: &str) -> PipelineResult<AnnotationBundle> {
        let mut bundle = AnnotationBundle::default();

        for channel in AnnotationChannel::ALL {
            let key = Self::channel_key(brand, video_stem, channel);
            let retry = RetryConfig::new(format!("fetch {}", key));

            let bytes = match retry_async(&retry, StorageError::is_retryable, || {
                self.store.get_bytes(&key)
            })
            .await
            {
                Ok(bytes) => bytes,
                Err(StorageError::NotFound(_)) => {
                    debug!("No {} annotations for {}/{}", channel.file_stem(), brand, video_stem);
                    continue;
                }
                Err(e) => {
                    return Err(PipelineError::annotation_fetch(video_stem, e.to_string()))
                }
            };

            let parsed: AnnotationBundle = serde_json::from_slice(&bytes)
                .map_err(|e| PipelineError::annotation_fetch(video_stem, e.to_string()))?;
            bundle.adopt_channel(channel, parsed);
        }

        Ok(bundle)
    }
}
