//! Error types for frame access and constraint handling.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the frame, the constraint model and the checks built on them.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A constraint set references a column the dataset does not have
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// A column was never profiled, so it has no constraint record
    #[error("Column '{0}' has no constraint record")]
    UnknownColumn(String),

    /// Constraint kind name outside the supported set
    #[error("Unknown constraint kind: {0}")]
    UnknownConstraintKind(String),

    /// Constraint value has the wrong shape for its kind
    #[error("Invalid value for constraint '{kind}' on column '{column}': expected {expected}, found {found}")]
    InvalidConstraintValue {
        /// Column the constraint belongs to
        column: String,
        /// Constraint kind name
        kind: String,
        /// Shape the kind requires
        expected: &'static str,
        /// Rendered offending value
        found: String,
    },

    /// A numeric operation met a non-numeric cell
    #[error("Column '{column}' holds non-numeric value '{value}'")]
    NotNumeric {
        /// Column name
        column: String,
        /// Rendered offending value
        value: String,
    },

    /// A value could not be coerced to a date
    #[error("Cannot parse '{value}' as a date in column '{column}'")]
    DateParse {
        /// Column name
        column: String,
        /// Rendered offending value
        value: String,
    },

    /// Columns of a frame disagree on their number of rows
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        /// Column name
        column: String,
        /// Row count of the first column
        expected: usize,
        /// Row count of this column
        actual: usize,
    },

    /// Frames with different column layouts cannot be concatenated
    #[error("Cannot concatenate frames with different columns: {0}")]
    SchemaMismatch(String),

    /// Concatenation was asked to join zero frames
    #[error("No frames to concatenate")]
    NothingToConcatenate,
}

impl CoreError {
    /// Creates a new missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn(column.into())
    }

    /// Creates a new invalid constraint value error.
    pub fn invalid_value(
        column: impl Into<String>,
        kind: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidConstraintValue {
            column: column.into(),
            kind: kind.into(),
            expected,
            found: found.into(),
        }
    }

    /// Creates a new non-numeric value error.
    pub fn not_numeric(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotNumeric {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Creates a new date parse error.
    pub fn date_parse(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DateParse {
            column: column.into(),
            value: value.into(),
        }
    }
}
