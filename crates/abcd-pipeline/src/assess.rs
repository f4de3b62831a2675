//! Per-video assessment aggregation.

use std::sync::Arc;
use tracing::{debug, warn};

use abcd_models::{AnnotationBundle, BrandCriteria, VideoAsset, VideoAssessment};

use crate::config::AssessmentConfig;
use crate::detectors::{fallback_results, registry, DetectorContext};
use crate::error::{PipelineError, PipelineResult};
use crate::llm::FeatureJudge;

/// Runs the full detector catalogue against one video.
pub struct VideoAssessor {
    config: Arc<AssessmentConfig>,
    judge: Option<Arc<FeatureJudge>>,
}

impl VideoAssessor {
    pub fn new(config: Arc<AssessmentConfig>, judge: Option<Arc<FeatureJudge>>) -> Self {
        Self { config, judge }
    }

    /// Size gate for LLM-backed runs. Oversize videos are refused outright
    /// rather than assessed without their LLM signals; downstream services
    /// have request-size limits and a silently degraded assessment would be
    /// indistinguishable from a genuine one.
    pub fn check_size_gate(&self, video: &VideoAsset) -> PipelineResult<()> {
        if self.config.use_llms && video.size_mb() > self.config.video_size_limit_mb {
            return Err(PipelineError::OversizeVideo {
                name: video.display_name.clone(),
                size_mb: video.size_mb(),
                limit_mb: self.config.video_size_limit_mb,
            });
        }
        Ok(())
    }

    /// Run every catalogue entry against `(bundle, video, criteria)` and
    /// aggregate into a scored assessment.
    ///
    /// Detectors run concurrently but their outputs land in catalogue-ordered
    /// slots, so the feature list is stable across runs regardless of
    /// individual detector latencies. A detector that errors or exceeds its
    /// timeout degrades to its full arity of not-detected results.
    pub async fn assess(
        &self,
        video: &VideoAsset,
        bundle: &AnnotationBundle,
        criteria: &BrandCriteria,
    ) -> PipelineResult<VideoAssessment> {
        self.check_size_gate(video)?;

        let ctx = DetectorContext {
            bundle,
            video,
            criteria,
            video_uri: video.uri(&self.config.bucket_name),
            preview_uri: video.preview_asset(0).uri(&self.config.bucket_name),
            use_annotations: self.config.use_annotations,
            judge: self.judge.clone(),
        };

        let catalogue = registry();
        let timeout = self.config.detector_timeout;

        let runs = catalogue.iter().map(|detector| {
            let ctx = &ctx;
            async move {
                match tokio::time::timeout(timeout, detector.detect(ctx)).await {
                    Ok(Ok(results)) => {
                        debug_assert_eq!(results.len(), detector.features().len());
                        results
                    }
                    Ok(Err(e)) => {
                        warn!("Detector {} failed for {}: {}", detector.name(), video, e);
                        fallback_results(
                            detector.as_ref(),
                            &format!("Detector failed: {}", e),
                        )
                    }
                    Err(_) => {
                        warn!(
                            "Detector {} timed out after {:?} for {}",
                            detector.name(),
                            timeout,
                            video
                        );
                        fallback_results(
                            detector.as_ref(),
                            &format!("Detector timed out after {}s", timeout.as_secs()),
                        )
                    }
                }
            }
        });

        // join_all preserves input order: slot i belongs to catalogue entry i.
        let slots = futures::future::join_all(runs).await;
        let features = slots.into_iter().flatten().collect();

        let assessment = VideoAssessment::from_features(
            video.display_name.clone(),
            video.uri(&self.config.bucket_name),
            features,
        );

        debug!(
            "Assessed {}: {}/{} features, score {:.2}",
            video,
            assessment.passed_features_count,
            assessment.total_features(),
            assessment.score
        );

        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abcd_models::{Classification, ShotAnnotation, TextAnnotation, TimeOffset};

    fn config(use_llms: bool) -> Arc<AssessmentConfig> {
        Arc::new(AssessmentConfig {
            use_llms,
            ..Default::default()
        })
    }

    fn video(size_bytes: u64) -> VideoAsset {
        VideoAsset::from_object("acme/videos/launch.mp4", size_bytes).unwrap()
    }

    #[tokio::test]
    async fn test_empty_bundle_scores_zero() {
        let assessor = VideoAssessor::new(config(false), None);
        let assessment = assessor
            .assess(
                &video(1_000),
                &AnnotationBundle::default(),
                &BrandCriteria::new("Acme"),
            )
            .await
            .unwrap();

        assert_eq!(assessment.total_features(), 23);
        assert_eq!(assessment.passed_features_count, 0);
        assert_eq!(assessment.score, 0.0);
        assert_eq!(assessment.classification(), Classification::NeedsReview);
        assert!(assessment.features.iter().all(|f| !f.feature_detected));
    }

    #[tokio::test]
    async fn test_feature_order_is_stable() {
        let bundle = AnnotationBundle {
            shot_annotations: vec![
                ShotAnnotation {
                    start_time_offset: TimeOffset::from_secs(0.0),
                    end_time_offset: TimeOffset::from_secs(1.0),
                };
                6
            ],
            text_annotations: vec![TextAnnotation {
                text: "SHOP NOW".to_string(),
                segments: vec![],
            }],
            ..Default::default()
        };
        let assessor = VideoAssessor::new(config(false), None);
        let criteria = BrandCriteria::new("Acme");

        let first = assessor.assess(&video(1_000), &bundle, &criteria).await.unwrap();
        let second = assessor.assess(&video(1_000), &bundle, &criteria).await.unwrap();

        let order: Vec<_> = first.features.iter().map(|f| f.feature).collect();
        let order_again: Vec<_> = second.features.iter().map(|f| f.feature).collect();
        assert_eq!(order, order_again);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_size_gate_refuses_oversize_video_when_llms_enabled() {
        let assessor = VideoAssessor::new(config(true), None);
        let err = assessor
            .assess(
                &video(9_000_000),
                &AnnotationBundle::default(),
                &BrandCriteria::new("Acme"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::OversizeVideo { .. }));
    }

    #[tokio::test]
    async fn test_size_gate_passes_small_video() {
        let assessor = VideoAssessor::new(config(true), None);
        // 4 MB under the default 7 MB limit; judge is None so detectors
        // simply skip their LLM consultations.
        assert!(assessor.check_size_gate(&video(4_000_000)).is_ok());
    }

    #[tokio::test]
    async fn test_size_gate_ignored_without_llms() {
        let assessor = VideoAssessor::new(config(false), None);
        assert!(assessor.check_size_gate(&video(9_000_000)).is_ok());
    }
}
