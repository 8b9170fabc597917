//! SDK error types

use riskwatch_core::CoreError;
use riskwatch_repository::RepositoryError;
use riskwatch_runtime::RuntimeError;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Core error
    #[error("Core error: {0}")]
    CoreError(#[from] CoreError),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] RuntimeError),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Stable classification of an [`SdkError`] for callers that branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed rule or candidate input
    Validation,
    /// Unknown rule id
    NotFound,
    /// Persistence failure
    Storage,
    /// Bad configuration
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Storage => "storage",
            ErrorKind::Config => "config",
        }
    }
}

impl SdkError {
    /// Stable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SdkError::ConfigError(_) => ErrorKind::Config,
            SdkError::CoreError(_) | SdkError::RuntimeError(_) => ErrorKind::Validation,
            SdkError::RepositoryError(err) => match err {
                RepositoryError::NotFound { .. } => ErrorKind::NotFound,
                RepositoryError::Validation(_) => ErrorKind::Validation,
                _ => ErrorKind::Storage,
            },
            SdkError::IoError(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
