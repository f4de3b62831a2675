//! Pacing features: quick pacing, dynamic start, overall pacing.
//!
//! All three read the shot annotation channel.

use async_trait::async_trait;

use abcd_models::{FeatureId, FeatureResult, ShotAnnotation};

use crate::error::PipelineResult;

use super::{apply_judge, DetectorContext, FeatureDetector, FIRST_5_SECS};

/// Shot changes needed for the video to count as quickly paced.
const QUICK_PACING_MIN_SHOTS: usize = 5;

/// The first shot must end within this many seconds for a dynamic start.
const DYNAMIC_START_MAX_FIRST_SHOT_SECS: f64 = 3.0;

/// Average shot duration ceiling for acceptable overall pacing.
const MAX_AVG_SHOT_SECS: f64 = 2.0;

fn shots_starting_before(shots: &[ShotAnnotation], secs: f64) -> usize {
    shots
        .iter()
        .filter(|s| s.start_time_offset.as_secs() < secs)
        .count()
}

/// Quick Pacing and its first-5-seconds variant.
pub struct QuickPacingDetector;

#[async_trait]
impl FeatureDetector for QuickPacingDetector {
    fn name(&self) -> &'static str {
        "quick_pacing"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[FeatureId::QuickPacing, FeatureId::QuickPacingFirst5Secs]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut overall = false;
        let mut first_5 = false;

        if ctx.use_annotations {
            let shots = &ctx.bundle.shot_annotations;
            overall = shots.len() >= QUICK_PACING_MIN_SHOTS;
            first_5 = shots_starting_before(shots, FIRST_5_SECS) >= QUICK_PACING_MIN_SHOTS;
        }

        let mut overall = FeatureResult::new(FeatureId::QuickPacing, overall);
        let mut first_5 = FeatureResult::new(FeatureId::QuickPacingFirst5Secs, first_5);

        apply_judge(
            ctx,
            &mut overall,
            "Are there at least 5 shot changes or visual changes in the video?",
        )
        .await;
        apply_judge(
            ctx,
            &mut first_5,
            "Are there at least 5 shot changes or visual changes in the first 5 seconds of the video?",
        )
        .await;

        Ok(vec![overall, first_5])
    }
}

/// Dynamic Start: the opening shot cuts away quickly.
pub struct DynamicStartDetector;

#[async_trait]
impl FeatureDetector for DynamicStartDetector {
    fn name(&self) -> &'static str {
        "dynamic_start"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[FeatureId::DynamicStart]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut detected = false;

        if ctx.use_annotations {
            detected = ctx
                .bundle
                .shot_annotations
                .first()
                .map(|s| s.end_time_offset.as_secs() < DYNAMIC_START_MAX_FIRST_SHOT_SECS)
                .unwrap_or(false);
        }

        let mut result = FeatureResult::new(FeatureId::DynamicStart, detected);
        apply_judge(
            ctx,
            &mut result,
            "Does the first shot of the video change in less than 3 seconds?",
        )
        .await;

        Ok(vec![result])
    }
}

/// Overall Pacing: average shot duration across the whole video.
pub struct OverallPacingDetector;

#[async_trait]
impl FeatureDetector for OverallPacingDetector {
    fn name(&self) -> &'static str {
        "overall_pacing"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[FeatureId::OverallPacing]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut detected = false;

        if ctx.use_annotations {
            let shots = &ctx.bundle.shot_annotations;
            if !shots.is_empty() {
                let total_secs: f64 = shots.iter().map(|s| s.duration_secs()).sum();
                let avg = total_secs / shots.len() as f64;
                detected = avg <= MAX_AVG_SHOT_SECS;
            }
        }

        let mut result = FeatureResult::new(FeatureId::OverallPacing, detected);
        apply_judge(
            ctx,
            &mut result,
            "Is the pace of the video at most 2 seconds per shot on average?",
        )
        .await;

        Ok(vec![result])
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::context;
    use super::*;
    use abcd_models::{AnnotationBundle, BrandCriteria, TimeOffset, VideoAsset};

    fn shot(start: f64, end: f64) -> ShotAnnotation {
        ShotAnnotation {
            start_time_offset: TimeOffset::from_secs(start),
            end_time_offset: TimeOffset::from_secs(end),
        }
    }

    fn video() -> VideoAsset {
        VideoAsset::from_object("acme/videos/launch.mp4", 1_000).unwrap()
    }

    #[tokio::test]
    async fn test_quick_pacing_counts_shots_in_window() {
        let bundle = AnnotationBundle {
            shot_annotations: vec![
                shot(0.0, 1.0),
                shot(1.0, 2.0),
                shot(2.0, 3.0),
                shot(3.0, 4.0),
                shot(4.0, 12.0),
                shot(12.0, 20.0),
            ],
            ..Default::default()
        };
        let video = video();
        let criteria = BrandCriteria::new("Acme");
        let ctx = context(&bundle, &video, &criteria);

        let results = QuickPacingDetector.detect(&ctx).await.unwrap();
        assert!(results[0].feature_detected, "six shots overall");
        assert!(results[1].feature_detected, "five shots start before 5s");
    }

    #[tokio::test]
    async fn test_quick_pacing_slow_video() {
        let bundle = AnnotationBundle {
            shot_annotations: vec![shot(0.0, 10.0), shot(10.0, 20.0)],
            ..Default::default()
        };
        let video = video();
        let criteria = BrandCriteria::new("Acme");
        let ctx = context(&bundle, &video, &criteria);

        let results = QuickPacingDetector.detect(&ctx).await.unwrap();
        assert!(!results[0].feature_detected);
        assert!(!results[1].feature_detected);
    }

    #[tokio::test]
    async fn test_dynamic_start_boundary() {
        let video = video();
        let criteria = BrandCriteria::new("Acme");

        let fast = AnnotationBundle {
            shot_annotations: vec![shot(0.0, 2.9), shot(2.9, 8.0)],
            ..Default::default()
        };
        let ctx = context(&fast, &video, &criteria);
        assert!(DynamicStartDetector.detect(&ctx).await.unwrap()[0].feature_detected);

        let slow = AnnotationBundle {
            shot_annotations: vec![shot(0.0, 3.0), shot(3.0, 8.0)],
            ..Default::default()
        };
        let ctx = context(&slow, &video, &criteria);
        assert!(!DynamicStartDetector.detect(&ctx).await.unwrap()[0].feature_detected);
    }

    #[tokio::test]
    async fn test_overall_pacing_average() {
        let video = video();
        let criteria = BrandCriteria::new("Acme");

        // avg 1.5s per shot
        let brisk = AnnotationBundle {
            shot_annotations: vec![shot(0.0, 1.0), shot(1.0, 3.0)],
            ..Default::default()
        };
        let ctx = context(&brisk, &video, &criteria);
        assert!(OverallPacingDetector.detect(&ctx).await.unwrap()[0].feature_detected);

        // avg 4s per shot
        let languid = AnnotationBundle {
            shot_annotations: vec![shot(0.0, 4.0), shot(4.0, 8.0)],
            ..Default::default()
        };
        let ctx = context(&languid, &video, &criteria);
        assert!(!OverallPacingDetector.detect(&ctx).await.unwrap()[0].feature_detected);
    }

    #[tokio::test]
    async fn test_annotations_disabled_detects_nothing() {
        let bundle = AnnotationBundle {
            shot_annotations: vec![shot(0.0, 1.0); 6],
            ..Default::default()
        };
        let video = video();
        let criteria = BrandCriteria::new("Acme");
        let mut ctx = context(&bundle, &video, &criteria);
        ctx.use_annotations = false;

        let results = QuickPacingDetector.detect(&ctx).await.unwrap();
        assert!(!results[0].feature_detected);
    }
}
