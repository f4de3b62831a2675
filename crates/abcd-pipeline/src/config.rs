//! Assessment run configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one assessment run.
///
/// Passed explicitly into each component's constructor; component lifetime is
/// scoped to one run.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    /// Bucket holding brand folders
    pub bucket_name: String,
    /// Per-video size ceiling for LLM-backed runs, in decimal megabytes
    pub video_size_limit_mb: f64,
    /// Whether to fetch annotation bundles
    pub use_annotations: bool,
    /// Whether detectors consult the LLM feature judge
    pub use_llms: bool,
    /// Whether to persist per-video assessment records locally
    pub store_results_locally: bool,
    /// Directory for locally persisted records
    pub results_dir: PathBuf,
    /// Maximum videos assessed in parallel
    pub max_video_parallel: usize,
    /// Per-detector timeout; a detector exceeding it degrades to not-detected
    pub detector_timeout: Duration,
    /// Preview clip window in seconds
    pub trim_start_secs: f64,
    pub trim_end_secs: f64,
    /// Lifetime of signed report URLs
    pub signed_url_ttl: Duration,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            bucket_name: "abcd-videos".to_string(),
            video_size_limit_mb: 7.0,
            use_annotations: true,
            use_llms: false,
            store_results_locally: false,
            results_dir: PathBuf::from("results"),
            max_video_parallel: 4,
            detector_timeout: Duration::from_secs(120),
            trim_start_secs: 0.0,
            trim_end_secs: 5.0,
            signed_url_ttl: Duration::from_secs(3600),
        }
    }
}

impl AssessmentConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bucket_name: std::env::var("ABCD_BUCKET_NAME").unwrap_or(defaults.bucket_name),
            video_size_limit_mb: std::env::var("ABCD_VIDEO_SIZE_LIMIT_MB")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.video_size_limit_mb),
            use_annotations: env_flag("ABCD_USE_ANNOTATIONS", defaults.use_annotations),
            use_llms: env_flag("ABCD_USE_LLMS", defaults.use_llms),
            store_results_locally: env_flag(
                "ABCD_STORE_RESULTS_LOCALLY",
                defaults.store_results_locally,
            ),
            results_dir: std::env::var("ABCD_RESULTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.results_dir),
            max_video_parallel: std::env::var("ABCD_MAX_VIDEO_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_video_parallel),
            detector_timeout: Duration::from_secs(
                std::env::var("ABCD_DETECTOR_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.detector_timeout.as_secs()),
            ),
            trim_start_secs: defaults.trim_start_secs,
            trim_end_secs: defaults.trim_end_secs,
            signed_url_ttl: Duration::from_secs(
                std::env::var("ABCD_SIGNED_URL_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.signed_url_ttl.as_secs()),
            ),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AssessmentConfig::default();
        assert_eq!(c.video_size_limit_mb, 7.0);
        assert!(c.use_annotations);
        assert!(!c.use_llms);
        assert_eq!(c.trim_end_secs, 5.0);
    }
}
