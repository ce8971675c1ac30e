use anyhow::{Context, Result};
use datacheck_store::load;
use std::path::Path;
use tracing::info;

use crate::output::{self, OutputFormat};

pub fn execute(constraints_path: &str, format: OutputFormat) -> Result<()> {
    info!("Reading constraints: {}", constraints_path);

    let constraints = load(Path::new(constraints_path))
        .with_context(|| format!("Failed to load constraints: {}", constraints_path))?;

    output::print_constraints(&constraints, format)
}
