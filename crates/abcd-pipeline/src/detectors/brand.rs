//! Brand features: visual presence (on-screen text and logos) and audio
//! mention (speech transcript).

use async_trait::async_trait;

use abcd_models::{FeatureId, FeatureResult, LogoAnnotation};

use crate::error::PipelineResult;

use super::{apply_judge, DetectorContext, FeatureDetector, FIRST_5_SECS};

/// Logos covering at least this fraction of the frame within the first 5
/// seconds count as prominent branding on their own.
const LOGO_BIG_MIN_AREA: f64 = 0.15;

fn logo_seen_before(logo: &LogoAnnotation, secs: f64) -> bool {
    logo.segments.iter().any(|s| s.starts_before(secs))
        || logo.tracks.iter().any(|t| t.segment.starts_before(secs))
}

fn logo_big_before(logo: &LogoAnnotation, secs: f64) -> bool {
    logo.tracks.iter().any(|t| {
        t.timestamped_objects.iter().any(|o| {
            o.time_offset.as_secs() < secs && o.normalized_bounding_box.area() >= LOGO_BIG_MIN_AREA
        })
    })
}

/// Brand Visuals and its first-5-seconds variant.
///
/// One pass over the text and logo channels feeds both results; a large
/// logo early in the video satisfies the first-5-seconds check by itself.
pub struct BrandVisualsDetector;

#[async_trait]
impl FeatureDetector for BrandVisualsDetector {
    fn name(&self) -> &'static str {
        "brand_visuals"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[FeatureId::BrandVisuals, FeatureId::BrandVisualsFirst5Secs]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut overall = false;
        let mut first_5 = false;

        if ctx.use_annotations {
            for text in &ctx.bundle.text_annotations {
                if ctx.criteria.matches_brand(&text.text) {
                    overall = true;
                    if text.appears_before(FIRST_5_SECS) {
                        first_5 = true;
                    }
                }
            }

            for logo in &ctx.bundle.logo_annotations {
                if ctx.criteria.matches_brand(&logo.entity.description) {
                    overall = true;
                    if logo_seen_before(logo, FIRST_5_SECS) || logo_big_before(logo, FIRST_5_SECS)
                    {
                        first_5 = true;
                    }
                }
            }
        }

        let mut overall = FeatureResult::new(FeatureId::BrandVisuals, overall);
        let mut first_5 = FeatureResult::new(FeatureId::BrandVisualsFirst5Secs, first_5);

        apply_judge(
            ctx,
            &mut overall,
            "Is the brand name or brand logo shown at any time in the video?",
        )
        .await;
        apply_judge(
            ctx,
            &mut first_5,
            "Is the brand name or brand logo shown in the first 5 seconds of the video?",
        )
        .await;

        Ok(vec![overall, first_5])
    }
}

/// Brand Mention (Speech) and its first-5-seconds variant.
pub struct BrandMentionSpeechDetector;

#[async_trait]
impl FeatureDetector for BrandMentionSpeechDetector {
    fn name(&self) -> &'static str {
        "brand_mention_speech"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[
            FeatureId::BrandMentionSpeech,
            FeatureId::BrandMentionSpeechFirst5Secs,
        ]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut overall = false;
        let mut first_5 = false;

        if ctx.use_annotations {
            overall = ctx.criteria.matches_brand(&ctx.bundle.full_transcript());
            first_5 = ctx
                .criteria
                .matches_brand(&ctx.bundle.transcript_before(FIRST_5_SECS));
        }

        let mut overall = FeatureResult::new(FeatureId::BrandMentionSpeech, overall);
        let mut first_5 =
            FeatureResult::new(FeatureId::BrandMentionSpeechFirst5Secs, first_5);

        apply_judge(
            ctx,
            &mut overall,
            "Is the brand name heard in the audio or speech at any time in the video?",
        )
        .await;
        apply_judge(
            ctx,
            &mut first_5,
            "Is the brand name heard in the audio or speech in the first 5 seconds of the video?",
        )
        .await;

        Ok(vec![overall, first_5])
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::context;
    use super::*;
    use abcd_models::{
        AnnotationBundle, BrandCriteria, Entity, NormalizedBoundingBox, Segment,
        SpeechAlternative, SpeechTranscription, TextAnnotation, TextSegment, TimeOffset, Track,
        TimestampedObject, VideoAsset, WordInfo,
    };

    fn video() -> VideoAsset {
        VideoAsset::from_object("acme/videos/launch.mp4", 1_000).unwrap()
    }

    fn criteria() -> BrandCriteria {
        BrandCriteria {
            brand_name: "Acme".to_string(),
            brand_variations: vec!["Acme Corp".to_string()],
            ..Default::default()
        }
    }

    fn segment(start: f64, end: f64) -> Segment {
        Segment {
            start_time_offset: TimeOffset::from_secs(start),
            end_time_offset: TimeOffset::from_secs(end),
        }
    }

    #[tokio::test]
    async fn test_brand_text_overlay_late_in_video() {
        let bundle = AnnotationBundle {
            text_annotations: vec![TextAnnotation {
                text: "ACME quality since 1949".to_string(),
                segments: vec![TextSegment {
                    segment: segment(20.0, 22.0),
                    confidence: 0.95,
                }],
            }],
            ..Default::default()
        };
        let video = video();
        let criteria = criteria();
        let ctx = context(&bundle, &video, &criteria);

        let results = BrandVisualsDetector.detect(&ctx).await.unwrap();
        assert!(results[0].feature_detected);
        assert!(!results[1].feature_detected, "overlay appears after 5s");
    }

    #[tokio::test]
    async fn test_big_logo_in_first_five_seconds() {
        let bundle = AnnotationBundle {
            logo_annotations: vec![abcd_models::LogoAnnotation {
                entity: Entity {
                    description: "Acme".to_string(),
                },
                tracks: vec![Track {
                    segment: segment(1.0, 2.0),
                    timestamped_objects: vec![TimestampedObject {
                        normalized_bounding_box: NormalizedBoundingBox {
                            left: 0.2,
                            top: 0.2,
                            right: 0.8,
                            bottom: 0.8,
                        },
                        time_offset: TimeOffset::from_secs(1.2),
                    }],
                    confidence: 0.9,
                }],
                segments: vec![],
            }],
            ..Default::default()
        };
        let video = video();
        let criteria = criteria();
        let ctx = context(&bundle, &video, &criteria);

        let results = BrandVisualsDetector.detect(&ctx).await.unwrap();
        assert!(results[0].feature_detected);
        assert!(results[1].feature_detected);
    }

    #[tokio::test]
    async fn test_brand_mention_speech_windows() {
        let bundle = AnnotationBundle {
            speech_transcriptions: vec![SpeechTranscription {
                alternatives: vec![SpeechAlternative {
                    transcript: "welcome to Acme Corp".to_string(),
                    confidence: 0.9,
                    words: vec![
                        WordInfo {
                            word: "welcome".to_string(),
                            start_time: TimeOffset::from_secs(1.0),
                            end_time: TimeOffset::from_secs(1.4),
                        },
                        WordInfo {
                            word: "to".to_string(),
                            start_time: TimeOffset::from_secs(1.5),
                            end_time: TimeOffset::from_secs(1.6),
                        },
                        WordInfo {
                            word: "Acme".to_string(),
                            start_time: TimeOffset::from_secs(7.0),
                            end_time: TimeOffset::from_secs(7.4),
                        },
                    ],
                }],
            }],
            ..Default::default()
        };
        let video = video();
        let criteria = criteria();
        let ctx = context(&bundle, &video, &criteria);

        let results = BrandMentionSpeechDetector.detect(&ctx).await.unwrap();
        assert!(results[0].feature_detected);
        assert!(
            !results[1].feature_detected,
            "the brand word itself starts after 5s"
        );
    }
}
