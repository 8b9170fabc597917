//! Runtime error types

use riskwatch_core::CoreError;
use thiserror::Error;

/// Runtime error
///
/// Scoring never fails; only candidate rules handed to the simulation
/// engine can be rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Candidate rule could not be parsed
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<CoreError> for RuntimeError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) | CoreError::TypeError(msg) => RuntimeError::Validation(msg),
        }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
