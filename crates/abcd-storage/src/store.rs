//! The store trait the pipeline programs against.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::StorageResult;

/// Information about a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,
    /// Size in bytes
    pub size: u64,
}

/// Write precondition for `put_bytes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PutPrecondition {
    /// Unconditional write, last writer wins.
    #[default]
    None,
    /// Create only if the key does not exist yet. A losing racer gets
    /// `StorageError::PreconditionFailed` instead of clobbering the winner.
    IfNotExists,
}

/// Blob store operations used by the assessment pipeline.
///
/// Implementations must make `put_bytes` all-or-nothing: a failed upload
/// must never leave a partial object that a later existence check mistakes
/// for a complete one.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// List objects under a prefix, in key order.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectInfo>>;

    /// Metadata for one object, or `None` if absent.
    async fn head(&self, key: &str) -> StorageResult<Option<ObjectInfo>>;

    /// Download an object's bytes.
    async fn get_bytes(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Upload an object, subject to the precondition.
    async fn put_bytes(
        &self,
        key: &str,
        data: Vec<u8>,
        precondition: PutPrecondition,
    ) -> StorageResult<()>;

    /// Stable public URL for an object.
    fn public_url(&self, key: &str) -> String;

    /// Time-limited signed URL for an object.
    async fn signed_url(&self, key: &str, ttl: Duration) -> StorageResult<String>;
}
