//! Attract features read from text and speech channels: supers (text
//! overlays), supers with audio, and early speech.

use async_trait::async_trait;

use abcd_models::{FeatureId, FeatureResult};

use crate::error::PipelineResult;

use super::{apply_judge, DetectorContext, FeatureDetector, FIRST_5_SECS};

/// Overlay words shorter than this are ignored when matched against the
/// transcript; single characters would match almost anything.
const MIN_SUPER_MATCH_LEN: usize = 3;

/// Supers and Supers with Audio, from one pass over the text channel.
pub struct SupersDetector;

#[async_trait]
impl FeatureDetector for SupersDetector {
    fn name(&self) -> &'static str {
        "supers"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[FeatureId::Supers, FeatureId::SupersWithAudio]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut supers = false;
        let mut with_audio = false;

        if ctx.use_annotations {
            supers = !ctx.bundle.text_annotations.is_empty();

            let overlay_texts: Vec<String> = ctx
                .bundle
                .text_annotations
                .iter()
                .map(|t| t.text.clone())
                .collect();
            with_audio = ctx
                .bundle
                .transcript_contains_any(&overlay_texts, MIN_SUPER_MATCH_LEN);
        }

        let mut supers = FeatureResult::new(FeatureId::Supers, supers);
        let mut with_audio = FeatureResult::new(FeatureId::SupersWithAudio, with_audio);

        apply_judge(
            ctx,
            &mut supers,
            "Are there any supers (text overlays) at any time in the video?",
        )
        .await;
        apply_judge(
            ctx,
            &mut with_audio,
            "Does the speech match any supers (text overlays) in the video, or is the speech \
             contextually supportive of the overlaid text shown on screen?",
        )
        .await;

        Ok(vec![supers, with_audio])
    }
}

/// Audio Early: speech is heard within the first 5 seconds.
pub struct AudioEarlyDetector;

#[async_trait]
impl FeatureDetector for AudioEarlyDetector {
    fn name(&self) -> &'static str {
        "audio_early"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[FeatureId::AudioEarlyFirst5Secs]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut detected = false;

        if ctx.use_annotations {
            detected = ctx.bundle.has_speech_before(FIRST_5_SECS);
        }

        let mut result = FeatureResult::new(FeatureId::AudioEarlyFirst5Secs, detected);
        apply_judge(
            ctx,
            &mut result,
            "Is speech heard in the audio within the first 5 seconds of the video?",
        )
        .await;

        Ok(vec![result])
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::context;
    use super::*;
    use abcd_models::{
        AnnotationBundle, BrandCriteria, SpeechAlternative, SpeechTranscription, TextAnnotation,
        TimeOffset, VideoAsset, WordInfo,
    };

    fn video() -> VideoAsset {
        VideoAsset::from_object("acme/videos/launch.mp4", 1_000).unwrap()
    }

    fn speech(transcript: &str, first_word_start: f64) -> SpeechTranscription {
        SpeechTranscription {
            alternatives: vec![SpeechAlternative {
                transcript: transcript.to_string(),
                confidence: 0.9,
                words: transcript
                    .split_whitespace()
                    .enumerate()
                    .map(|(i, w)| WordInfo {
                        word: w.to_string(),
                        start_time: TimeOffset::from_secs(first_word_start + i as f64 * 0.5),
                        end_time: TimeOffset::from_secs(first_word_start + i as f64 * 0.5 + 0.4),
                    })
                    .collect(),
            }],
        }
    }

    #[tokio::test]
    async fn test_supers_from_text_annotations() {
        let bundle = AnnotationBundle {
            text_annotations: vec![TextAnnotation {
                text: "limited offer".to_string(),
                segments: vec![],
            }],
            ..Default::default()
        };
        let video = video();
        let criteria = BrandCriteria::new("Acme");
        let ctx = context(&bundle, &video, &criteria);

        let results = SupersDetector.detect(&ctx).await.unwrap();
        assert!(results[0].feature_detected);
        // No speech channel, so no audio correlation
        assert!(!results[1].feature_detected);
    }

    #[tokio::test]
    async fn test_supers_with_audio_matches_transcript() {
        let bundle = AnnotationBundle {
            text_annotations: vec![
                TextAnnotation {
                    text: "limited offer".to_string(),
                    segments: vec![],
                },
                // Too short to be matched against the transcript
                TextAnnotation {
                    text: "ad".to_string(),
                    segments: vec![],
                },
            ],
            speech_transcriptions: vec![speech("a truly limited offer today", 0.5)],
            ..Default::default()
        };
        let video = video();
        let criteria = BrandCriteria::new("Acme");
        let ctx = context(&bundle, &video, &criteria);

        let results = SupersDetector.detect(&ctx).await.unwrap();
        assert!(results[0].feature_detected);
        assert!(results[1].feature_detected);
    }

    #[tokio::test]
    async fn test_audio_early_window() {
        let video = video();
        let criteria = BrandCriteria::new("Acme");

        let early = AnnotationBundle {
            speech_transcriptions: vec![speech("welcome to acme", 1.0)],
            ..Default::default()
        };
        let ctx = context(&early, &video, &criteria);
        assert!(AudioEarlyDetector.detect(&ctx).await.unwrap()[0].feature_detected);

        let late = AnnotationBundle {
            speech_transcriptions: vec![speech("welcome to acme", 9.0)],
            ..Default::default()
        };
        let ctx = context(&late, &video, &criteria);
        assert!(!AudioEarlyDetector.detect(&ctx).await.unwrap()[0].feature_detected);
    }
}
