//! Error types for the repository layer

use riskwatch_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur during registry and store operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Operation referenced an unknown (or deleted) rule
    #[error("Rule not found: {id}")]
    NotFound { id: String },

    /// Malformed rule input
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding or decoding failed
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Invalid path provided
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Other error
    #[error("Repository error: {0}")]
    Other(String),
}

impl From<CoreError> for RepositoryError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) | CoreError::TypeError(msg) => RepositoryError::Validation(msg),
        }
    }
}

impl RepositoryError {
    pub(crate) fn not_found(id: &str) -> Self {
        RepositoryError::NotFound { id: id.to_string() }
    }
}
