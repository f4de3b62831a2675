//! Pipeline error types.
//!
//! The taxonomy distinguishes four tiers: fatal-to-run (no assessment can be
//! produced), fatal-to-video (one video is skipped with a diagnostic),
//! fatal-to-feature (one detector degrades to not-detected), and retryable
//! I/O handled at the point of use.

use thiserror::Error;

use abcd_media::MediaError;
use abcd_models::ModelError;
use abcd_storage::StorageError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that can occur while running an assessment.
#[derive(Debug, Error)]
pub enum PipelineError {
    // Fatal to the run
    #[error("No videos found under {folder}")]
    NoVideosFound { folder: String },

    #[error("All {skipped} discovered videos were skipped; no assessment produced")]
    AllVideosSkipped { skipped: usize },

    // Fatal to one video
    #[error("Video {name} is {size_mb:.1} MB, over the {limit_mb} MB limit for LLM-backed runs")]
    OversizeVideo {
        name: String,
        size_mb: f64,
        limit_mb: f64,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Annotation fetch failed for {video}: {message}")]
    AnnotationFetch { video: String, message: String },

    // Fatal to one feature
    #[error("Detector {name} failed: {message}")]
    DetectorFailed { name: String, message: String },

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    pub fn detector_failed(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::DetectorFailed {
            name: name.into(),
            message: msg.into(),
        }
    }

    pub fn annotation_fetch(video: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::AnnotationFetch {
            video: video.into(),
            message: msg.into(),
        }
    }

    /// Whether this error signals an empty run rather than a failure of the
    /// pipeline machinery. Callers message the two cases differently.
    pub fn is_empty_run(&self) -> bool {
        matches!(
            self,
            Self::NoVideosFound { .. } | Self::AllVideosSkipped { .. }
        )
    }
}
