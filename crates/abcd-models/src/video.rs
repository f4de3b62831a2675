//! Video asset models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, ModelResult};

/// Marker appended to the stem of derived preview clips.
pub const PREVIEW_SUFFIX: &str = "_1st_5_secs";

/// A video object discovered under a brand's videos folder.
///
/// Object paths decompose into exactly `{brand}/{category}/{filename}`;
/// anything else is rejected at construction time rather than guessed at
/// later stages of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoAsset {
    /// Full object key, `{brand}/{category}/{filename}`
    pub object_path: String,
    /// Brand segment of the object path
    pub brand: String,
    /// Category segment of the object path (normally `videos`)
    pub category: String,
    /// File name including extension
    pub display_name: String,
    /// File name without extension
    pub stem: String,
    /// Format extension (e.g. `mp4`)
    pub format: String,
    /// Object size in bytes
    pub size_bytes: u64,
}

impl VideoAsset {
    /// Parse a store object into a video asset.
    ///
    /// The file name must carry exactly one extension separator; names like
    /// `clip.tar.gz` or extension-less blobs cannot be resolved to a format
    /// and are rejected.
    pub fn from_object(object_path: &str, size_bytes: u64) -> ModelResult<Self> {
        let parts: Vec<&str> = object_path.split('/').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(ModelError::malformed_path(object_path));
        }
        let display_name = parts[2].to_string();

        let name_parts: Vec<&str> = display_name.split('.').collect();
        if name_parts.len() != 2 || name_parts.iter().any(|p| p.is_empty()) {
            return Err(ModelError::malformed_path(object_path));
        }
        let stem = name_parts[0].to_string();
        let format = name_parts[1].to_string();

        Ok(Self {
            object_path: object_path.to_string(),
            brand: parts[0].to_string(),
            category: parts[1].to_string(),
            display_name,
            stem,
            format,
            size_bytes,
        })
    }

    /// Store URI for this asset in the given bucket.
    pub fn uri(&self, bucket: &str) -> String {
        format!("gs://{}/{}", bucket, self.object_path)
    }

    /// Whether this object is itself a derived preview clip.
    pub fn is_preview_clip(&self) -> bool {
        self.display_name.contains(PREVIEW_SUFFIX)
    }

    /// File name of the derived preview clip.
    pub fn preview_name(&self) -> String {
        format!("{}{}.{}", self.stem, PREVIEW_SUFFIX, self.format)
    }

    /// Object key of the derived preview clip, in the same folder.
    pub fn preview_object_path(&self) -> String {
        format!("{}/{}/{}", self.brand, self.category, self.preview_name())
    }

    /// Derived preview clip asset. Size is unknown until materialized.
    pub fn preview_asset(&self, size_bytes: u64) -> VideoAsset {
        VideoAsset {
            object_path: self.preview_object_path(),
            brand: self.brand.clone(),
            category: self.category.clone(),
            display_name: self.preview_name(),
            stem: format!("{}{}", self.stem, PREVIEW_SUFFIX),
            format: self.format.clone(),
            size_bytes,
        }
    }

    /// Object size in decimal megabytes.
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1e6
    }
}

impl fmt::Display for VideoAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.object_path)
    }
}
