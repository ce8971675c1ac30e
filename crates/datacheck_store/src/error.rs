//! Error types for constraint and dataset persistence.

use datacheck_core::CoreError;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while saving or loading constraint sets and datasets.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File extension names a format the store cannot handle
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Path has no usable extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// File I/O error
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failed
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing or serialization failed
    #[error("Failed to process CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A stored value set could not be decoded
    #[error("Invalid value set at position {position}: {message}")]
    SetLiteral { position: usize, message: String },

    /// A CSV row does not describe a column
    #[error("Malformed row {line}: {message}")]
    MalformedRow { line: u64, message: String },

    /// Constraint model error raised while rebuilding records
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a new set literal error.
    pub fn set_literal(position: usize, message: impl Into<String>) -> Self {
        Self::SetLiteral {
            position,
            message: message.into(),
        }
    }

    /// Creates a new malformed row error.
    pub fn malformed_row(line: u64, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            line,
            message: message.into(),
        }
    }
}
