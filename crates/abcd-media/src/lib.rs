//! FFmpeg CLI wrapper for preview clip extraction.
//!
//! This crate provides:
//! - An FFmpeg command builder and async runner with timeout
//! - The trim operation that materializes 5-second preview clips

pub mod command;
pub mod error;
pub mod trim;

pub use command::{FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use trim::trim_clip;
