//! File format selection by extension.

use crate::{Result, StoreError};
use std::fmt;
use std::path::Path;

/// Supported constraint file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintFormat {
    /// JSON object keyed by column (.json)
    Json,
    /// Transposed table, one row per column (.csv)
    Csv,
}

impl fmt::Display for ConstraintFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintFormat::Json => f.write_str("json"),
            ConstraintFormat::Csv => f.write_str("csv"),
        }
    }
}

/// Detect the constraint file format from a path's extension.
///
/// # Supported Extensions
///
/// * `.json` → `ConstraintFormat::Json`
/// * `.csv` → `ConstraintFormat::Csv`
///
/// Matching is case-insensitive.
///
/// # Errors
///
/// Returns `StoreError::InvalidExtension` if the path has no extension.
/// Returns `StoreError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ConstraintFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(StoreError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "json" => Ok(ConstraintFormat::Json),
        "csv" => Ok(ConstraintFormat::Csv),
        other => Err(StoreError::UnsupportedFormat(other.to_string())),
    }
}
