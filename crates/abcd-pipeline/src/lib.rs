//! The ABCD assessment pipeline.
//!
//! Components, leaves first:
//! - `trim_cache`: idempotent preview-clip materialization
//! - `annotations`: gateway to per-video annotation bundles
//! - `detectors`: the fixed feature detector catalogue
//! - `assess`: per-video aggregation into a scored assessment
//! - `collector`: brand-level discovery and bounded fan-out
//! - `report`: digest, tabular matrix and persisted record renderers
//! - `llm`: optional LLM feature judge consulted by detectors

pub mod annotations;
pub mod assess;
pub mod collector;
pub mod config;
pub mod detectors;
pub mod error;
pub mod llm;
pub mod report;
pub mod retry;
pub mod trim_cache;

pub use annotations::{AnnotationGateway, StoreAnnotationGateway};
pub use assess::VideoAssessor;
pub use collector::BrandCollector;
pub use config::AssessmentConfig;
pub use error::{PipelineError, PipelineResult};
pub use llm::FeatureJudge;
pub use trim_cache::{FfmpegTrimmer, PreviewTrimmer, TrimCache};
