//! Model error types.

use thiserror::Error;

/// Result type for model construction and parsing.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building model types from raw store data.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Malformed object path: {0}")]
    MalformedObjectPath(String),

    #[error("Invalid brand criteria: {0}")]
    InvalidCriteria(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    pub fn malformed_path(path: impl Into<String>) -> Self {
        Self::MalformedObjectPath(path.into())
    }

    pub fn invalid_criteria(msg: impl Into<String>) -> Self {
        Self::InvalidCriteria(msg.into())
    }
}
