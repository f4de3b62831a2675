//! Annotation bundle models.
//!
//! Record shapes mirror the video-intelligence payloads produced by the
//! annotation subsystem. The pipeline treats records as opaque beyond channel
//! identity and timestamps; detectors interpret the details. Every field
//! defaults so partially-populated or entirely absent channels deserialize
//! cleanly.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Offset from the start of the video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeOffset {
    #[serde(default)]
    pub seconds: i64,
    #[serde(default)]
    pub nanos: i32,
}

impl TimeOffset {
    pub fn as_secs(&self) -> f64 {
        self.seconds as f64 + self.nanos as f64 / 1e9
    }

    pub fn from_secs(secs: f64) -> Self {
        Self {
            seconds: secs.trunc() as i64,
            nanos: (secs.fract() * 1e9).round() as i32,
        }
    }
}

/// A time window within the video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    #[serde(default)]
    pub start_time_offset: TimeOffset,
    #[serde(default)]
    pub end_time_offset: TimeOffset,
}

impl Segment {
    /// Whether the segment begins before `secs` seconds into the video.
    pub fn starts_before(&self, secs: f64) -> bool {
        self.start_time_offset.as_secs() < secs
    }
}

/// One detected shot (camera cut to camera cut).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShotAnnotation {
    #[serde(default)]
    pub start_time_offset: TimeOffset,
    #[serde(default)]
    pub end_time_offset: TimeOffset,
}

impl ShotAnnotation {
    pub fn duration_secs(&self) -> f64 {
        self.end_time_offset.as_secs() - self.start_time_offset.as_secs()
    }
}

/// Knowledge-graph entity reference attached to label/logo annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Entity {
    #[serde(default)]
    pub description: String,
}

/// Scored time window for a label annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabelSegment {
    #[serde(default)]
    pub segment: Segment,
    #[serde(default)]
    pub confidence: f64,
}

/// One detected label (object/scene category).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabelAnnotation {
    #[serde(default)]
    pub entity: Entity,
    #[serde(default)]
    pub category_entities: Vec<Entity>,
    #[serde(default)]
    pub segments: Vec<LabelSegment>,
}

/// Bounding box in normalized [0,1] coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedBoundingBox {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
}

impl NormalizedBoundingBox {
    /// Fraction of the frame covered by the box.
    pub fn area(&self) -> f64 {
        ((self.right - self.left).max(0.0)) * ((self.bottom - self.top).max(0.0))
    }
}

/// A detection at one instant within a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimestampedObject {
    #[serde(default)]
    pub normalized_bounding_box: NormalizedBoundingBox,
    #[serde(default)]
    pub time_offset: TimeOffset,
}

/// A tracked detection across a time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Track {
    #[serde(default)]
    pub segment: Segment,
    #[serde(default)]
    pub timestamped_objects: Vec<TimestampedObject>,
    #[serde(default)]
    pub confidence: f64,
}

/// One detected face across the video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceAnnotation {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// One detected person across the video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonAnnotation {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Scored time window for a text annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextSegment {
    #[serde(default)]
    pub segment: Segment,
    #[serde(default)]
    pub confidence: f64,
}

/// One detected on-screen text (super).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextAnnotation {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub segments: Vec<TextSegment>,
}

impl TextAnnotation {
    /// Whether the text first appears before `secs` seconds into the video.
    pub fn appears_before(&self, secs: f64) -> bool {
        self.segments.iter().any(|s| s.segment.starts_before(secs))
    }
}

/// One detected logo across the video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogoAnnotation {
    #[serde(default)]
    pub entity: Entity,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// A recognized word with its time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WordInfo {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub start_time: TimeOffset,
    #[serde(default)]
    pub end_time: TimeOffset,
}

/// One transcription hypothesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeechAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub words: Vec<WordInfo>,
}

/// Speech recognized over one audio segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeechTranscription {
    #[serde(default)]
    pub alternatives: Vec<SpeechAlternative>,
}

/// Identity of one annotation channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationChannel {
    Label,
    Face,
    People,
    Shot,
    Text,
    Logo,
    Speech,
}

impl AnnotationChannel {
    pub const ALL: [AnnotationChannel; 7] = [
        AnnotationChannel::Label,
        AnnotationChannel::Face,
        AnnotationChannel::People,
        AnnotationChannel::Shot,
        AnnotationChannel::Text,
        AnnotationChannel::Logo,
        AnnotationChannel::Speech,
    ];

    /// File stem of the channel document under the video's annotations folder.
    pub fn file_stem(&self) -> &'static str {
        match self {
            AnnotationChannel::Label => "label",
            AnnotationChannel::Face => "face",
            AnnotationChannel::People => "people",
            AnnotationChannel::Shot => "shot",
            AnnotationChannel::Text => "text",
            AnnotationChannel::Logo => "logo",
            AnnotationChannel::Speech => "speech",
        }
    }
}

/// The seven annotation channels for one video.
///
/// `AnnotationBundle::default()` is all-empty; detectors must treat an empty
/// or partially-populated bundle as "nothing detected", never as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationBundle {
    #[serde(default)]
    pub label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    pub face_annotations: Vec<FaceAnnotation>,
    #[serde(default)]
    pub people_annotations: Vec<PersonAnnotation>,
    #[serde(default)]
    pub shot_annotations: Vec<ShotAnnotation>,
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    pub logo_annotations: Vec<LogoAnnotation>,
    #[serde(default)]
    pub speech_transcriptions: Vec<SpeechTranscription>,
}

impl AnnotationBundle {
    pub fn is_empty(&self) -> bool {
        self.label_annotations.is_empty()
            && self.face_annotations.is_empty()
            && self.people_annotations.is_empty()
            && self.shot_annotations.is_empty()
            && self.text_annotations.is_empty()
            && self.logo_annotations.is_empty()
            && self.speech_transcriptions.is_empty()
    }

    /// Replace one channel's contents with those parsed from a channel document.
    pub fn adopt_channel(&mut self, channel: AnnotationChannel, parsed: AnnotationBundle) {
        match channel {
            AnnotationChannel::Label => self.label_annotations = parsed.label_annotations,
            AnnotationChannel::Face => self.face_annotations = parsed.face_annotations,
            AnnotationChannel::People => self.people_annotations = parsed.people_annotations,
            AnnotationChannel::Shot => self.shot_annotations = parsed.shot_annotations,
            AnnotationChannel::Text => self.text_annotations = parsed.text_annotations,
            AnnotationChannel::Logo => self.logo_annotations = parsed.logo_annotations,
            AnnotationChannel::Speech => self.speech_transcriptions = parsed.speech_transcriptions,
        }
    }

    /// Full speech transcript, space-joined across segments.
    pub fn full_transcript(&self) -> String {
        let parts: Vec<&str> = self
            .speech_transcriptions
            .iter()
            .flat_map(|t| t.alternatives.iter())
            .map(|a| a.transcript.trim())
            .filter(|t| !t.is_empty())
            .collect();
        parts.join(" ")
    }

    /// Transcript restricted to words that start before `secs` seconds.
    pub fn transcript_before(&self, secs: f64) -> String {
        let words: Vec<&str> = self
            .speech_transcriptions
            .iter()
            .flat_map(|t| t.alternatives.iter())
            .flat_map(|a| a.words.iter())
            .filter(|w| w.start_time.as_secs() < secs)
            .map(|w| w.word.as_str())
            .collect();
        words.join(" ")
    }

    /// Whether any recognized word starts before `secs` seconds.
    pub fn has_speech_before(&self, secs: f64) -> bool {
        self.speech_transcriptions
            .iter()
            .flat_map(|t| t.alternatives.iter())
            .flat_map(|a| a.words.iter())
            .any(|w| w.start_time.as_secs() < secs)
    }

    /// Whether the transcript contains any of `elements`, case-insensitive.
    ///
    /// `min_element_len` filters out short elements before matching; text
    /// annotations sometimes yield one-character words that would match
    /// almost any transcript.
    pub fn transcript_contains_any(&self, elements: &[String], min_element_len: usize) -> bool {
        let transcript = self.full_transcript().to_lowercase();
        if transcript.is_empty() {
            return false;
        }
        elements
            .iter()
            .map(|e| e.trim())
            .filter(|e| e.chars().count() >= min_element_len)
            .any(|e| transcript.contains(&e.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(w: &str, start: f64) -> WordInfo {
        WordInfo {
            word: w.to_string(),
            start_time: TimeOffset::from_secs(start),
            end_time: TimeOffset::from_secs(start + 0.4),
        }
    }

    fn bundle_with_speech() -> AnnotationBundle {
        AnnotationBundle {
            speech_transcriptions: vec![SpeechTranscription {
                alternatives: vec![SpeechAlternative {
                    transcript: "buy now at the Acme store".to_string(),
                    confidence: 0.9,
                    words: vec![word("buy", 1.0), word("now", 1.5), word("Acme", 6.0)],
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_time_offset_round_trip() {
        let t = TimeOffset::from_secs(4.25);
        assert_eq!(t.seconds, 4);
        assert!((t.as_secs() - 4.25).abs() < 1e-9);
    }

    #[test]
    fn test_default_bundle_is_empty() {
        assert!(AnnotationBundle::default().is_empty());
        assert!(!bundle_with_speech().is_empty());
    }

    #[test]
    fn test_full_transcript() {
        assert_eq!(bundle_with_speech().full_transcript(), "buy now at the Acme store");
        assert_eq!(AnnotationBundle::default().full_transcript(), "");
    }

    #[test]
    fn test_transcript_before() {
        let b = bundle_with_speech();
        assert_eq!(b.transcript_before(5.0), "buy now");
        assert!(b.has_speech_before(5.0));
        assert!(!AnnotationBundle::default().has_speech_before(5.0));
    }

    #[test]
    fn test_transcript_contains_any_filters_short_elements() {
        let b = bundle_with_speech();
        assert!(b.transcript_contains_any(&["ACME".to_string()], 3));
        // One-character element is filtered by the length condition
        assert!(!b.transcript_contains_any(&["a".to_string()], 3));
        assert!(!b.transcript_contains_any(&["missing".to_string()], 3));
    }

    #[test]
    fn test_channel_document_adoption() {
        let doc = r#"{"shot_annotations": [
            {"start_time_offset": {"seconds": 0}, "end_time_offset": {"seconds": 2, "nanos": 500000000}}
        ]}"#;
        let parsed: AnnotationBundle = serde_json::from_str(doc).unwrap();
        let mut bundle = AnnotationBundle::default();
        bundle.adopt_channel(AnnotationChannel::Shot, parsed);
        assert_eq!(bundle.shot_annotations.len(), 1);
        assert!((bundle.shot_annotations[0].duration_secs() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_area() {
        let b = NormalizedBoundingBox {
            left: 0.25,
            top: 0.25,
            right: 0.75,
            bottom: 0.75,
        };
        assert!((b.area() - 0.25).abs() < 1e-9);
    }
}
