use anyhow::{Context, Result};
use datacheck_store::{load, read_dataset, write_dataset};
use datacheck_validator::Verifier;
use std::path::Path;
use tracing::info;

use super::DatasetArgs;
use crate::output::{self, OutputFormat};

pub fn execute(
    dataset_path: &str,
    constraints_path: &str,
    violations_path: Option<&str>,
    format: OutputFormat,
    args: &DatasetArgs,
) -> Result<()> {
    info!("Verifying dataset: {}", dataset_path);
    info!("Constraints: {}", constraints_path);

    let constraints = load(Path::new(constraints_path))
        .with_context(|| format!("Failed to load constraints: {}", constraints_path))?;

    let frame = read_dataset(Path::new(dataset_path), &args.to_options()?)
        .with_context(|| format!("Failed to read dataset: {}", dataset_path))?;

    let verifier = Verifier::new(&frame, &constraints).context("Verification failed")?;

    if let Some(path) = violations_path {
        write_dataset(verifier.violations(), Path::new(path))
            .with_context(|| format!("Failed to write violating rows: {}", path))?;
        info!(
            "Wrote {} violating rows to {}",
            verifier.violations().height(),
            path
        );
    }

    output::print_verification_report(&verifier, format)?;

    if !verifier.passed() {
        std::process::exit(1);
    }

    Ok(())
}
