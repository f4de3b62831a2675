//! Shared data models for the ABCD assessment pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Video assets discovered in the object store
//! - Annotation bundles (the seven pre-computed annotation channels)
//! - Brand criteria used by feature detectors
//! - The rubric feature catalogue
//! - Per-video and per-brand assessment records

pub mod annotation;
pub mod assessment;
pub mod criteria;
pub mod error;
pub mod feature;
pub mod video;

// Re-export common types
pub use annotation::{
    AnnotationBundle, AnnotationChannel, Entity, FaceAnnotation, LabelAnnotation, LabelSegment,
    LogoAnnotation, NormalizedBoundingBox, PersonAnnotation, Segment, ShotAnnotation,
    SpeechAlternative, SpeechTranscription, TextAnnotation, TextSegment, TimeOffset,
    TimestampedObject, Track, WordInfo,
};
pub use assessment::{
    BrandAssessment, Classification, FeatureResult, LlmDetail, VideoAssessment,
};
pub use criteria::{BrandCriteria, CALL_TO_ACTION_PHRASES, CALL_TO_ACTION_VERBS};
pub use error::{ModelError, ModelResult};
pub use feature::FeatureId;
pub use video::{VideoAsset, PREVIEW_SUFFIX};
