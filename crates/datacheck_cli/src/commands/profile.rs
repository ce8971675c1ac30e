use anyhow::{Context, Result};
use datacheck_store::{detect_format, read_dataset, save};
use datacheck_validator::Profiler;
use std::path::Path;
use tracing::info;

use super::DatasetArgs;
use crate::output;

pub fn execute(dataset_path: &str, output_path: &str, args: &DatasetArgs) -> Result<()> {
    info!("Profiling dataset: {}", dataset_path);

    // Reject the output format before doing any work
    let output_file = Path::new(output_path);
    detect_format(output_file)
        .with_context(|| format!("Cannot write constraints to: {}", output_path))?;

    let frame = read_dataset(Path::new(dataset_path), &args.to_options()?)
        .with_context(|| format!("Failed to read dataset: {}", dataset_path))?;

    output::print_info(&format!(
        "Dataset loaded: {} rows, {} columns",
        frame.height(),
        frame.width()
    ));

    let mut profiler = Profiler::new();
    let constraints = profiler
        .generate(&frame)
        .context("Failed to profile dataset")?;

    save(constraints, output_file)
        .with_context(|| format!("Failed to save constraints: {}", output_path))?;

    output::print_success(&format!(
        "Constraints for {} columns written to {}",
        constraints.len(),
        output_path
    ));

    Ok(())
}
