//! Assessment records: feature results, per-video and per-brand aggregates.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::feature::FeatureId;

/// Evidence recorded when an LLM judgment contributed to a feature verdict,
/// or when a detector degraded and wants its reason surfaced in reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub llm_explanation: String,
}

impl LlmDetail {
    /// Detail carrying only an explanation, used for degraded detectors.
    pub fn explanation(text: impl Into<String>) -> Self {
        Self {
            model: None,
            prompt: None,
            llm_explanation: text.into(),
        }
    }
}

/// Outcome of one rubric feature check for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureResult {
    pub feature: FeatureId,
    pub feature_description: String,
    pub feature_detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_details: Option<Vec<LlmDetail>>,
}

impl FeatureResult {
    pub fn new(feature: FeatureId, detected: bool) -> Self {
        Self {
            feature,
            feature_description: feature.description().to_string(),
            feature_detected: detected,
            confidence: None,
            llm_details: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_llm_detail(mut self, detail: LlmDetail) -> Self {
        self.llm_details.get_or_insert_with(Vec::new).push(detail);
        self
    }

    /// First recorded explanation, if any. Reports surface this.
    pub fn explanation(&self) -> &str {
        self.llm_details
            .as_deref()
            .and_then(|d| d.first())
            .map(|d| d.llm_explanation.as_str())
            .unwrap_or("")
    }
}

/// Classification band derived from a video's score at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Classification {
    Excellent,
    MightImprove,
    NeedsReview,
}

impl Classification {
    /// Band boundaries are inclusive on their lower edge: 80.0 is Excellent,
    /// 65.0 is Might Improve.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Classification::Excellent
        } else if score >= 65.0 {
            Classification::MightImprove
        } else {
            Classification::NeedsReview
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Excellent => "Excellent",
            Classification::MightImprove => "Might Improve",
            Classification::NeedsReview => "Needs Review",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregated rubric outcome for one video.
///
/// `score` is kept unrounded; rounding is a presentation concern applied
/// independently by each renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoAssessment {
    pub video_name: String,
    pub video_uri: String,
    pub features: Vec<FeatureResult>,
    pub passed_features_count: usize,
    pub score: f64,
}

impl VideoAssessment {
    /// Build from the flattened feature results, counting and scoring.
    pub fn from_features(
        video_name: impl Into<String>,
        video_uri: impl Into<String>,
        features: Vec<FeatureResult>,
    ) -> Self {
        let passed = features.iter().filter(|f| f.feature_detected).count();
        let total = features.len();
        let score = if total > 0 {
            (passed as f64 * 100.0) / total as f64
        } else {
            0.0
        };
        Self {
            video_name: video_name.into(),
            video_uri: video_uri.into(),
            features,
            passed_features_count: passed,
            score,
        }
    }

    pub fn total_features(&self) -> usize {
        self.features.len()
    }

    pub fn classification(&self) -> Classification {
        Classification::from_score(self.score)
    }
}

/// All video assessments for one brand, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BrandAssessment {
    pub brand_name: String,
    pub video_assessments: Vec<VideoAssessment>,
}

impl BrandAssessment {
    pub fn new(brand_name: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            video_assessments: Vec::new(),
        }
    }

    pub fn push(&mut self, assessment: VideoAssessment) {
        self.video_assessments.push(assessment);
    }

    pub fn is_empty(&self) -> bool {
        self.video_assessments.is_empty()
    }
}
