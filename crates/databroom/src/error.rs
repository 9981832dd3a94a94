//! Error types for the databroom library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for databroom operations.
#[derive(Debug, Error)]
pub enum BroomError {
    /// An argument had the wrong type or shape for the operation it was passed to.
    #[error("Invalid input for '{operation}': {message}")]
    InputType { operation: String, message: String },

    /// The operation name is not in the registry.
    #[error("Operation '{0}' is not available in the pipeline")]
    UnknownOperation(String),

    /// Undo or code generation was requested with nothing recorded.
    #[error("Empty history: {0}")]
    EmptyHistory(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Malformed text history entry or parameter literal.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),
}

impl BroomError {
    /// Shorthand for an [`BroomError::InputType`] raised by `operation`.
    pub fn input_type(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InputType {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for databroom operations.
pub type Result<T> = std::result::Result<T, BroomError>;
