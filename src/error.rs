//! Error types for multi-label stratification

use thiserror::Error;

/// Result type alias for stratification operations
pub type Result<T> = std::result::Result<T, StratifyError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum StratifyError {
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for StratifyError {
    fn from(err: serde_json::Error) -> Self {
        StratifyError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for StratifyError {
    fn from(err: ndarray::ShapeError) -> Self {
        StratifyError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
