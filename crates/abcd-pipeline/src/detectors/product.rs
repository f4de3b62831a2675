//! Product features: visual presence (label channel), on-screen text
//! mentions, and speech mentions. Each matches against branded products and
//! branded product categories.

use async_trait::async_trait;

use abcd_models::{FeatureId, FeatureResult, LabelAnnotation};

use crate::error::PipelineResult;

use super::{apply_judge, DetectorContext, FeatureDetector, FIRST_5_SECS};

fn label_matches(ctx: &DetectorContext<'_>, label: &LabelAnnotation) -> bool {
    ctx.criteria.matches_product(&label.entity.description)
        || ctx.criteria.matches_category(&label.entity.description)
        || label
            .category_entities
            .iter()
            .any(|e| ctx.criteria.matches_category(&e.description))
}

fn label_seen_before(label: &LabelAnnotation, secs: f64) -> bool {
    label.segments.iter().any(|s| s.segment.starts_before(secs))
}

/// Product Visuals and its first-5-seconds variant.
pub struct ProductVisualsDetector;

#[async_trait]
impl FeatureDetector for ProductVisualsDetector {
    fn name(&self) -> &'static str {
        "product_visuals"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[
            FeatureId::ProductVisuals,
            FeatureId::ProductVisualsFirst5Secs,
        ]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut overall = false;
        let mut first_5 = false;

        if ctx.use_annotations {
            for label in &ctx.bundle.label_annotations {
                if label_matches(ctx, label) {
                    overall = true;
                    if label_seen_before(label, FIRST_5_SECS) {
                        first_5 = true;
                    }
                }
            }
        }

        let mut overall = FeatureResult::new(FeatureId::ProductVisuals, overall);
        let mut first_5 = FeatureResult::new(FeatureId::ProductVisualsFirst5Secs, first_5);

        apply_judge(
            ctx,
            &mut overall,
            "Is a branded product or branded product category shown at any time in the video?",
        )
        .await;
        apply_judge(
            ctx,
            &mut first_5,
            "Is a branded product or branded product category shown in the first 5 seconds of the video?",
        )
        .await;

        Ok(vec![overall, first_5])
    }
}

/// Product Mention (Text) and its first-5-seconds variant.
pub struct ProductMentionTextDetector;

#[async_trait]
impl FeatureDetector for ProductMentionTextDetector {
    fn name(&self) -> &'static str {
        "product_mention_text"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[
            FeatureId::ProductMentionText,
            FeatureId::ProductMentionTextFirst5Secs,
        ]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut overall = false;
        let mut first_5 = false;

        if ctx.use_annotations {
            for text in &ctx.bundle.text_annotations {
                if ctx.criteria.matches_product(&text.text)
                    || ctx.criteria.matches_category(&text.text)
                {
                    overall = true;
                    if text.appears_before(FIRST_5_SECS) {
                        first_5 = true;
                    }
                }
            }
        }

        let mut overall = FeatureResult::new(FeatureId::ProductMentionText, overall);
        let mut first_5 = FeatureResult::new(FeatureId::ProductMentionTextFirst5Secs, first_5);

        apply_judge(
            ctx,
            &mut overall,
            "Is a branded product or branded product category shown in on-screen text at any time in the video?",
        )
        .await;
        apply_judge(
            ctx,
            &mut first_5,
            "Is a branded product or branded product category shown in on-screen text in the first 5 seconds of the video?",
        )
        .await;

        Ok(vec![overall, first_5])
    }
}

/// Product Mention (Speech) and its first-5-seconds variant.
pub struct ProductMentionSpeechDetector;

#[async_trait]
impl FeatureDetector for ProductMentionSpeechDetector {
    fn name(&self) -> &'static str {
        "product_mention_speech"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[
            FeatureId::ProductMentionSpeech,
            FeatureId::ProductMentionSpeechFirst5Secs,
        ]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut overall = false;
        let mut first_5 = false;

        if ctx.use_annotations {
            let transcript = ctx.bundle.full_transcript();
            overall = ctx.criteria.matches_product(&transcript)
                || ctx.criteria.matches_category(&transcript);

            let early = ctx.bundle.transcript_before(FIRST_5_SECS);
            first_5 =
                ctx.criteria.matches_product(&early) || ctx.criteria.matches_category(&early);
        }

        let mut overall = FeatureResult::new(FeatureId::ProductMentionSpeech, overall);
        let mut first_5 =
            FeatureResult::new(FeatureId::ProductMentionSpeechFirst5Secs, first_5);

        apply_judge(
            ctx,
            &mut overall,
            "Is a branded product or branded product category heard in the speech at any time in the video?",
        )
        .await;
        apply_judge(
            ctx,
            &mut first_5,
            "Is a branded product or branded product category heard in the speech in the first 5 seconds of the video?",
        )
        .await;

        Ok(vec![overall, first_5])
    }
}
