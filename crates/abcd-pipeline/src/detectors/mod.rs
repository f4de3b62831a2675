//! The feature detector registry.
//!
//! Detectors are logically independent: each is a pure function from
//! (annotation bundle, video, brand criteria) to one or two feature results,
//! and none observes another's output. The registry is a static ordered
//! catalogue; order matters only for deterministic report ordering, never
//! for correctness.

use async_trait::async_trait;
use std::sync::Arc;

use abcd_models::{
    AnnotationBundle, BrandCriteria, FeatureId, FeatureResult, LlmDetail, VideoAsset,
};

use crate::error::PipelineResult;
use crate::llm::FeatureJudge;

mod brand;
mod cta;
mod pacing;
mod people;
mod product;
mod supers;

pub use brand::{BrandMentionSpeechDetector, BrandVisualsDetector};
pub use cta::{CallToActionSpeechDetector, CallToActionTextDetector};
pub use pacing::{DynamicStartDetector, OverallPacingDetector, QuickPacingDetector};
pub use people::{PresenceOfPeopleDetector, VisibleFaceDetector};
pub use product::{
    ProductMentionSpeechDetector, ProductMentionTextDetector, ProductVisualsDetector,
};
pub use supers::{AudioEarlyDetector, SupersDetector};

/// Window covered by the "first 5 seconds" feature variants.
pub const FIRST_5_SECS: f64 = 5.0;

/// Inputs shared by every detector for one video.
pub struct DetectorContext<'a> {
    pub bundle: &'a AnnotationBundle,
    pub video: &'a VideoAsset,
    pub criteria: &'a BrandCriteria,
    /// Store URI of the full video
    pub video_uri: String,
    /// Store URI of the derived preview clip
    pub preview_uri: String,
    /// Whether annotation channels should be consulted
    pub use_annotations: bool,
    /// LLM judge, present only when LLM-backed detection is enabled
    pub judge: Option<Arc<FeatureJudge>>,
}

impl DetectorContext<'_> {
    /// URI a judge should inspect for the given feature: first-5-seconds
    /// variants look at the preview clip, everything else at the full video.
    pub fn judge_uri(&self, feature: FeatureId) -> &str {
        match feature {
            FeatureId::QuickPacingFirst5Secs
            | FeatureId::BrandVisualsFirst5Secs
            | FeatureId::BrandMentionSpeechFirst5Secs
            | FeatureId::ProductVisualsFirst5Secs
            | FeatureId::ProductMentionTextFirst5Secs
            | FeatureId::ProductMentionSpeechFirst5Secs
            | FeatureId::VisibleFaceFirst5Secs
            | FeatureId::PresenceOfPeopleFirst5Secs
            | FeatureId::AudioEarlyFirst5Secs
            | FeatureId::DynamicStart => &self.preview_uri,
            _ => &self.video_uri,
        }
    }
}

/// One catalogue entry.
///
/// `features()` declares the fixed output arity; `detect` must return
/// exactly those features in that order regardless of input. Absent or
/// empty annotation channels degrade to `detected=false`, never to an
/// error or a missing result.
#[async_trait]
pub trait FeatureDetector: Send + Sync {
    fn name(&self) -> &'static str;

    fn features(&self) -> &'static [FeatureId];

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>>;
}

/// The static catalogue, in report order.
pub fn registry() -> Vec<Box<dyn FeatureDetector>> {
    vec![
        Box::new(QuickPacingDetector),
        Box::new(DynamicStartDetector),
        Box::new(SupersDetector),
        Box::new(BrandVisualsDetector),
        Box::new(BrandMentionSpeechDetector),
        Box::new(ProductVisualsDetector),
        Box::new(ProductMentionTextDetector),
        Box::new(ProductMentionSpeechDetector),
        Box::new(VisibleFaceDetector),
        Box::new(PresenceOfPeopleDetector),
        Box::new(AudioEarlyDetector),
        Box::new(OverallPacingDetector),
        Box::new(CallToActionSpeechDetector),
        Box::new(CallToActionTextDetector),
    ]
}

/// Full-arity not-detected results for a degraded detector.
pub fn fallback_results(detector: &dyn FeatureDetector, reason: &str) -> Vec<FeatureResult> {
    detector
        .features()
        .iter()
        .map(|&feature| {
            FeatureResult::new(feature, false).with_llm_detail(LlmDetail::explanation(reason))
        })
        .collect()
}

/// OR an LLM verdict into `result`, recording the evidence.
///
/// Judge failures are fatal to the feature only: the result keeps its
/// annotation-derived verdict and the failure is noted in the evidence.
pub(crate) async fn apply_judge(
    ctx: &DetectorContext<'_>,
    result: &mut FeatureResult,
    question: &str,
) {
    let Some(judge) = ctx.judge.as_deref() else {
        return;
    };
    let uri = ctx.judge_uri(result.feature);
    match judge.judge(result.feature, question, uri).await {
        Ok((detected, detail)) => {
            if detected {
                result.feature_detected = true;
            }
            result.llm_details.get_or_insert_with(Vec::new).push(detail);
        }
        Err(e) => {
            result
                .llm_details
                .get_or_insert_with(Vec::new)
                .push(LlmDetail::explanation(format!("LLM evaluation failed: {}", e)));
        }
    }
}
