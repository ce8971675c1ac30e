pub mod profile;
pub mod show;
pub mod verify;

use anyhow::{Result, bail};
use clap::Args;
use datacheck_store::DatasetOptions;

/// Options shared by the commands that read a dataset.
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Columns to read as categorical (comma separated)
    #[arg(long, value_delimiter = ',')]
    categorical: Vec<String>,

    /// Columns to parse as dates (comma separated)
    #[arg(long, value_delimiter = ',')]
    dates: Vec<String>,

    /// Field delimiter of the dataset
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

impl DatasetArgs {
    pub fn to_options(&self) -> Result<DatasetOptions> {
        if !self.delimiter.is_ascii() {
            bail!("Delimiter must be a single ASCII character, got '{}'", self.delimiter);
        }
        Ok(DatasetOptions::new()
            .with_categorical(self.categorical.iter().cloned())
            .with_dates(self.dates.iter().cloned())
            .with_delimiter(self.delimiter as u8))
    }
}
