//! LLM feature judge.
//!
//! Optional second opinion for feature detectors: given a rubric question
//! and a video URI, the judge returns a boolean verdict with an explanation.
//! The judge's internals (model choice, prompting) are deliberately opaque
//! to the rest of the pipeline; detectors only see `(detected, detail)`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use abcd_models::{FeatureId, LlmDetail};

use crate::error::{PipelineError, PipelineResult};

const DEFAULT_MODEL: &str = "gemini-1.5-pro";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini-backed feature judge.
pub struct FeatureJudge {
    api_key: String,
    model: String,
    client: Client,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Verdict the model is asked to return.
#[derive(Debug, Deserialize)]
struct Verdict {
    detected: bool,
    #[serde(default)]
    explanation: String,
}

impl FeatureJudge {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            client: Client::new(),
            timeout,
        }
    }

    /// Create from environment variables.
    pub fn from_env(timeout: Duration) -> PipelineResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| PipelineError::config("GEMINI_API_KEY not set"))?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(api_key, model, timeout))
    }

    /// Ask whether `feature` holds for the video at `video_uri`.
    ///
    /// The returned detail carries the prompt and explanation for the
    /// report's evidence column.
    pub async fn judge(
        &self,
        feature: FeatureId,
        question: &str,
        video_uri: &str,
    ) -> PipelineResult<(bool, LlmDetail)> {
        let prompt = format!(
            "{question}\n\
             Consider the following criteria for your answer: {criteria}\n\
             The video to evaluate is at: {video_uri}\n\
             Look through each frame in the video carefully and answer the question.\n\
             Return JSON with keys \"detected\" (boolean) and \"explanation\" (string).",
            question = question,
            criteria = feature.description(),
            video_uri = video_uri,
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );

        debug!("Judging {} for {}", feature, video_uri);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::llm(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::llm(format!(
                "Gemini API returned {}",
                response.status()
            )));
        }

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::llm(e.to_string()))?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| PipelineError::llm("empty response"))?;

        let verdict: Verdict = serde_json::from_str(text)
            .map_err(|e| PipelineError::llm(format!("unparseable verdict: {}", e)))?;

        let detail = LlmDetail {
            model: Some(self.model.clone()),
            prompt: Some(prompt),
            llm_explanation: verdict.explanation,
        };

        Ok((verdict.detected, detail))
    }
}
