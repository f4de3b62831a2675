//! Idempotent preview-clip materialization.
//!
//! For each source video the cache derives the canonical preview name,
//! checks the store, and materializes the clip (download, trim, upload)
//! exactly once. Concurrent runs against the same brand may race on the
//! create step; the conditional upload makes the race harmless since the
//! content is derived and reproducible.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use abcd_media::MediaResult;
use abcd_models::VideoAsset;
use abcd_storage::{BlobStore, PutPrecondition, StorageError};

use crate::error::PipelineResult;
use crate::retry::{retry_async, RetryConfig};

/// Seam for the trim operation, so the cache logic is testable without an
/// ffmpeg binary.
#[async_trait]
pub trait PreviewTrimmer: Send + Sync {
    async fn trim(&self, input: &Path, output: &Path, start: f64, end: f64) -> MediaResult<()>;
}

/// Production trimmer backed by ffmpeg.
#[derive(Debug, Default)]
pub struct FfmpegTrimmer;

#[async_trait]
impl PreviewTrimmer for FfmpegTrimmer {
    async fn trim(&self, input: &Path, output: &Path, start: f64, end: f64) -> MediaResult<()> {
        abcd_media::trim_clip(input, output, start, end).await
    }
}

/// Trim-to-preview cache over the blob store.
pub struct TrimCache {
    store: Arc<dyn BlobStore>,
    trimmer: Arc<dyn PreviewTrimmer>,
    start_secs: f64,
    end_secs: f64,
}

impl TrimCache {
    pub fn new(store: Arc<dyn BlobStore>, start_secs: f64, end_secs: f64) -> Self {
        Self::with_trimmer(store, Arc::new(FfmpegTrimmer), start_secs, end_secs)
    }

    pub fn with_trimmer(
        store: Arc<dyn BlobStore>,
        trimmer: Arc<dyn PreviewTrimmer>,
        start_secs: f64,
        end_secs: f64,
    ) -> Self {
        Self {
            store,
            trimmer,
            start_secs,
            end_secs,
        }
    }

    /// Ensure the preview clip for `video` exists in the store.
    ///
    /// Cache hit returns immediately with no transform side effects. On
    /// miss the source is staged locally, trimmed, and uploaded with a
    /// create-only precondition; losing that race to another worker counts
    /// as a hit. The staging directory is released on every exit path.
    pub async fn ensure_preview_clip(&self, video: &VideoAsset) -> PipelineResult<VideoAsset> {
        let preview_path = video.preview_object_path();

        if let Some(info) = self.store.head(&preview_path).await? {
            debug!("Preview clip {} already exists, skipping trim", preview_path);
            return Ok(video.preview_asset(info.size));
        }

        // Staging area; dropped (and deleted) on success and failure alike.
        let staging = tempfile::tempdir()?;
        let source_path = staging.path().join(&video.display_name);
        let output_path = staging.path().join(video.preview_name());

        let retry = RetryConfig::new(format!("download {}", video.object_path));
        let bytes = retry_async(&retry, StorageError::is_retryable, || {
            self.store.get_bytes(&video.object_path)
        })
        .await?;
        tokio::fs::write(&source_path, &bytes).await?;

        self.trimmer
            .trim(&source_path, &output_path, self.start_secs, self.end_secs)
            .await?;

        let data = tokio::fs::read(&output_path).await?;
        let size = data.len() as u64;

        let retry = RetryConfig::new(format!("upload {}", preview_path));
        let won = retry_async(&retry, StorageError::is_retryable, || {
            let data = data.clone();
            let preview_path = preview_path.clone();
            async move {
                match self
                    .store
                    .put_bytes(&preview_path, data, PutPrecondition::IfNotExists)
                    .await
                {
                    Ok(()) => Ok(true),
                    // Another worker materialized the clip between our
                    // existence check and upload; its copy is equivalent.
                    Err(StorageError::PreconditionFailed(_)) => Ok(false),
                    Err(e) => Err(e),
                }
            }
        })
        .await?;

        if won {
            info!(
                "Preview clip {} materialized ({} bytes)",
                preview_path, size
            );
        } else {
            warn!(
                "Preview clip {} was created concurrently; discarding local copy",
                preview_path
            );
        }

        Ok(video.preview_asset(size))
    }
}
