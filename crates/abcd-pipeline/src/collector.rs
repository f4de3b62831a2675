//! Brand-level collection: discovery, bounded per-video fan-out, assembly.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use abcd_models::{
    AnnotationBundle, BrandAssessment, BrandCriteria, VideoAsset, VideoAssessment, PREVIEW_SUFFIX,
};
use abcd_storage::{BlobStore, StorageError};

use crate::annotations::AnnotationGateway;
use crate::assess::VideoAssessor;
use crate::config::AssessmentConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::report;
use crate::retry::{retry_async, RetryConfig};
use crate::trim_cache::TrimCache;

/// Collects video assessments for one brand.
///
/// The collector owns the `BrandAssessment` for the duration of a run;
/// per-video workers own their asset, bundle and assessment exclusively and
/// hand results back through discovery-indexed slots, so the final list is
/// assembled by a single writer in discovery order.
pub struct BrandCollector {
    store: Arc<dyn BlobStore>,
    annotations: Arc<dyn AnnotationGateway>,
    trim_cache: Arc<TrimCache>,
    assessor: Arc<VideoAssessor>,
    config: Arc<AssessmentConfig>,
}

impl BrandCollector {
    pub fn new(
        store: Arc<dyn BlobStore>,
        annotations: Arc<dyn AnnotationGateway>,
        trim_cache: Arc<TrimCache>,
        assessor: Arc<VideoAssessor>,
        config: Arc<AssessmentConfig>,
    ) -> Self {
        Self {
            store,
            annotations,
            trim_cache,
            assessor,
            config,
        }
    }

    /// Run the full assessment for every qualifying video under
    /// `{brand}/videos/`.
    ///
    /// Returns `NoVideosFound` if discovery yields no candidates (before any
    /// worker is launched) and `AllVideosSkipped` if candidates existed but
    /// every one was filtered; callers message the two cases differently.
    pub async fn collect(&self, criteria: &BrandCriteria) -> PipelineResult<BrandAssessment> {
        let folder = format!("{}/videos/", criteria.brand_name);

        let retry = RetryConfig::new(format!("list {}", folder));
        let objects = retry_async(&retry, StorageError::is_retryable, || {
            self.store.list(&folder)
        })
        .await?;

        let mut candidates = Vec::new();
        for obj in objects {
            // Folder marker and already-derived preview clips are not
            // assessment candidates.
            if obj.key.ends_with('/') || obj.key.contains(PREVIEW_SUFFIX) {
                continue;
            }
            match VideoAsset::from_object(&obj.key, obj.size) {
                Ok(video) => candidates.push(video),
                Err(e) => {
                    warn!("Video name not resolved for {}: {}. Skipping.", obj.key, e);
                }
            }
        }

        if candidates.is_empty() {
            return Err(PipelineError::NoVideosFound { folder });
        }

        info!(
            "Assessing {} videos for brand {}",
            candidates.len(),
            criteria.brand_name
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_video_parallel.max(1)));
        let mut join_set: JoinSet<(usize, PipelineResult<VideoAssessment>)> = JoinSet::new();

        for (index, video) in candidates.iter().cloned().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("semaphore closed");

            let annotations = Arc::clone(&self.annotations);
            let trim_cache = Arc::clone(&self.trim_cache);
            let assessor = Arc::clone(&self.assessor);
            let config = Arc::clone(&self.config);
            let criteria = criteria.clone();

            join_set.spawn(async move {
                let _permit = permit;
                let result =
                    assess_one(annotations, trim_cache, assessor, config, criteria, &video).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<VideoAssessment>> = vec![None; candidates.len()];
        let mut skipped = 0usize;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, Ok(assessment))) => slots[index] = Some(assessment),
                Ok((index, Err(e))) => {
                    skipped += 1;
                    warn!("Skipping video {}: {}", candidates[index], e);
                }
                Err(e) => {
                    skipped += 1;
                    warn!("Video worker panicked: {}", e);
                }
            }
        }

        let mut assessment = BrandAssessment::new(criteria.brand_name.clone());
        for video_assessment in slots.into_iter().flatten() {
            if self.config.store_results_locally {
                if let Err(e) = report::store_video_assessment_locally(
                    &self.config.results_dir,
                    &criteria.brand_name,
                    &video_assessment,
                ) {
                    warn!("Failed to persist local record: {}", e);
                }
            }
            assessment.push(video_assessment);
        }

        if assessment.is_empty() {
            return Err(PipelineError::AllVideosSkipped { skipped });
        }

        info!(
            "Brand {} assessed: {} videos, {} skipped",
            criteria.brand_name,
            assessment.video_assessments.len(),
            skipped
        );

        Ok(assessment)
    }
}

/// One video's pipeline: size gate, trim, annotate, assess.
async fn assess_one(
    annotations: Arc<dyn AnnotationGateway>,
    trim_cache: Arc<TrimCache>,
    assessor: Arc<VideoAssessor>,
    config: Arc<AssessmentConfig>,
    criteria: BrandCriteria,
    video: &VideoAsset,
) -> PipelineResult<VideoAssessment> {
    // Gate before the trim so oversize videos do not pay transcoding cost
    // just to be refused by the aggregator.
    assessor.check_size_gate(video)?;

    trim_cache.ensure_preview_clip(video).await?;

    let bundle = if config.use_annotations {
        annotations.fetch(&video.brand, &video.stem).await?
    } else {
        AnnotationBundle::default()
    };

    assessor.assess(video, &bundle, &criteria).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use abcd_media::MediaResult;
    use abcd_storage::MemoryBlobStore;
    use async_trait::async_trait;
    use std::path::Path;

    use crate::trim_cache::PreviewTrimmer;

    struct CopyTrimmer;

    #[async_trait]
    impl PreviewTrimmer for CopyTrimmer {
        async fn trim(&self, input: &Path, output: &Path, _s: f64, _e: f64) -> MediaResult<()> {
            tokio::fs::copy(input, output).await?;
            Ok(())
        }
    }

    struct EmptyAnnotations;

    #[async_trait]
    impl AnnotationGateway for EmptyAnnotations {
        async fn fetch(&self, _brand: &str, _stem: &str) -> PipelineResult<AnnotationBundle> {
            Ok(AnnotationBundle::default())
        }
    }

    fn collector(
        store: Arc<MemoryBlobStore>,
        config: AssessmentConfig,
    ) -> BrandCollector {
        let config = Arc::new(config);
        let store: Arc<dyn BlobStore> = store;
        let trim_cache = Arc::new(TrimCache::with_trimmer(
            Arc::clone(&store),
            Arc::new(CopyTrimmer),
            config.trim_start_secs,
            config.trim_end_secs,
        ));
        let assessor = Arc::new(VideoAssessor::new(Arc::clone(&config), None));
        BrandCollector::new(
            store,
            Arc::new(EmptyAnnotations),
            trim_cache,
            assessor,
            config,
        )
    }

    fn criteria() -> BrandCriteria {
        BrandCriteria::new("acme")
    }

    fn base_config() -> AssessmentConfig {
        AssessmentConfig {
            use_annotations: false,
            ..Default::default()
        }
    }

    fn seed_video(store: &MemoryBlobStore, name: &str, size: usize) {
        store.insert(format!("acme/videos/{}", name), vec![0u8; size]);
    }

    #[tokio::test]
    async fn test_no_videos_found() {
        let store = Arc::new(MemoryBlobStore::new());
        // Folder marker only
        store.insert("acme/videos/", Vec::new());

        let err = collector(store, base_config())
            .collect(&criteria())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoVideosFound { .. }));
    }

    #[tokio::test]
    async fn test_discovery_excludes_previews_and_malformed_names() {
        let store = Arc::new(MemoryBlobStore::new());
        store.insert("acme/videos/", Vec::new());
        seed_video(&store, "launch.mp4", 100);
        seed_video(&store, "launch_1st_5_secs.mp4", 10);
        seed_video(&store, "noextension", 100);

        let assessment = collector(Arc::clone(&store), base_config())
            .collect(&criteria())
            .await
            .unwrap();

        assert_eq!(assessment.video_assessments.len(), 1);
        assert_eq!(assessment.video_assessments[0].video_name, "launch.mp4");
    }

    #[tokio::test]
    async fn test_results_keep_discovery_order() {
        let store = Arc::new(MemoryBlobStore::new());
        for name in ["a.mp4", "b.mp4", "c.mp4", "d.mp4"] {
            seed_video(&store, name, 100);
        }

        let assessment = collector(Arc::clone(&store), base_config())
            .collect(&criteria())
            .await
            .unwrap();

        let names: Vec<_> = assessment
            .video_assessments
            .iter()
            .map(|v| v.video_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4", "c.mp4", "d.mp4"]);
    }

    #[tokio::test]
    async fn test_oversize_videos_are_skipped_not_fatal() {
        let store = Arc::new(MemoryBlobStore::new());
        seed_video(&store, "small.mp4", 4_000_000);
        seed_video(&store, "big.mp4", 9_000_000);

        let config = AssessmentConfig {
            use_llms: true,
            video_size_limit_mb: 7.0,
            ..base_config()
        };

        let assessment = collector(Arc::clone(&store), config)
            .collect(&criteria())
            .await
            .unwrap();

        assert_eq!(assessment.video_assessments.len(), 1);
        assert_eq!(assessment.video_assessments[0].video_name, "small.mp4");
    }

    #[tokio::test]
    async fn test_all_videos_skipped_is_distinct_from_none_found() {
        let store = Arc::new(MemoryBlobStore::new());
        seed_video(&store, "big.mp4", 9_000_000);

        let config = AssessmentConfig {
            use_llms: true,
            video_size_limit_mb: 7.0,
            ..base_config()
        };

        let err = collector(Arc::clone(&store), config)
            .collect(&criteria())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::AllVideosSkipped { skipped: 1 }
        ));
    }

    #[tokio::test]
    async fn test_preview_clips_are_materialized_once() {
        let store = Arc::new(MemoryBlobStore::new());
        seed_video(&store, "launch.mp4", 100);

        let c = collector(Arc::clone(&store), base_config());
        c.collect(&criteria()).await.unwrap();
        assert!(store.contains("acme/videos/launch_1st_5_secs.mp4"));

        // Second run discovers the same source video (previews are excluded
        // from discovery) and hits the cache.
        let assessment = c.collect(&criteria()).await.unwrap();
        assert_eq!(assessment.video_assessments.len(), 1);
    }
}
