//! Object store gateway.
//!
//! This crate provides:
//! - The `BlobStore` trait the pipeline programs against
//! - An S3-compatible client (endpoint-configured, works against GCS/R2/S3
//!   interoperability endpoints)
//! - An in-memory store for tests and local runs
//! - Conditional-write preconditions for race-safe cache fills

pub mod client;
pub mod error;
pub mod memory;
pub mod store;

pub use client::{S3BlobStore, StoreConfig};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryBlobStore;
pub use store::{BlobStore, ObjectInfo, PutPrecondition};
