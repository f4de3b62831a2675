//! Direct features: call-to-action phrases in speech and in on-screen text.

use async_trait::async_trait;

use abcd_models::{FeatureId, FeatureResult, CALL_TO_ACTION_VERBS};

use crate::error::PipelineResult;

use super::{apply_judge, DetectorContext, FeatureDetector};

/// Call To Action (Speech).
pub struct CallToActionSpeechDetector;

#[async_trait]
impl FeatureDetector for CallToActionSpeechDetector {
    fn name(&self) -> &'static str {
        "call_to_action_speech"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[FeatureId::CallToActionSpeech]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut detected = false;

        if ctx.use_annotations {
            detected = ctx
                .criteria
                .matches_call_to_action(&ctx.bundle.full_transcript());
        }

        let mut result = FeatureResult::new(FeatureId::CallToActionSpeech, detected);
        apply_judge(
            ctx,
            &mut result,
            "Is any call to action heard or mentioned in the speech of the video?",
        )
        .await;

        Ok(vec![result])
    }
}

/// Call To Action (Text).
///
/// On-screen supers rarely fit a full phrase, so the verb forms are matched
/// as well as the phrase table.
pub struct CallToActionTextDetector;

#[async_trait]
impl FeatureDetector for CallToActionTextDetector {
    fn name(&self) -> &'static str {
        "call_to_action_text"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[FeatureId::CallToActionText]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut detected = false;

        if ctx.use_annotations {
            detected = ctx.bundle.text_annotations.iter().any(|t| {
                ctx.criteria.matches_call_to_action(&t.text)
                    || CALL_TO_ACTION_VERBS
                        .iter()
                        .any(|v| t.text.to_uppercase().contains(v))
            });
        }

        let mut result = FeatureResult::new(FeatureId::CallToActionText, detected);
        apply_judge(
            ctx,
            &mut result,
            "Is any call to action phrase shown in the supers (overlaid text) of the video?",
        )
        .await;

        Ok(vec![result])
    }
}
