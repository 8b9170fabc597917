//! Error types for RiskWatch Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Rule input has the wrong shape (conditions not a mapping, score out of range)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Input value has the wrong type, such as an unparseable timestamp
    #[error("Type error: {0}")]
    TypeError(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
