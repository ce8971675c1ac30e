//! Saving and loading constraint sets with format detection.

use crate::csv_format::{from_csv_str, to_csv_string};
use crate::format::{ConstraintFormat, detect_format};
use crate::json::{from_json_str, to_json_string};
use crate::Result;
use datacheck_core::ConstraintSet;
use std::path::Path;
use tracing::info;

/// Saves a constraint set to `path` in the format its extension names.
///
/// The extension is checked before anything is written, so an unsupported
/// one leaves no file behind.
///
/// # Example
///
/// ```no_run
/// use datacheck_core::ConstraintSet;
/// use datacheck_store::save;
/// use std::path::Path;
///
/// save(&ConstraintSet::new(), Path::new("constraints.json")).unwrap();
/// ```
pub fn save(constraints: &ConstraintSet, path: &Path) -> Result<()> {
    let format = detect_format(path)?;
    let content = match format {
        ConstraintFormat::Json => to_json_string(constraints)?,
        ConstraintFormat::Csv => to_csv_string(constraints)?,
    };
    std::fs::write(path, content)?;
    info!(
        path = %path.display(),
        format = %format,
        columns = constraints.len(),
        "Constraints saved"
    );
    Ok(())
}

/// Loads a constraint set from `path` with automatic format detection.
///
/// The format is determined by the file extension:
/// - `.json` → parsed as JSON
/// - `.csv` → parsed as a transposed CSV table
pub fn load(path: &Path) -> Result<ConstraintSet> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let constraints = match format {
        ConstraintFormat::Json => from_json_str(&content)?,
        ConstraintFormat::Csv => from_csv_str(&content)?,
    };
    info!(
        path = %path.display(),
        format = %format,
        columns = constraints.len(),
        "Constraints loaded"
    );
    Ok(constraints)
}
