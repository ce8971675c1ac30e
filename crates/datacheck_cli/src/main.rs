mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::DatasetArgs;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "datacheck")]
#[command(version, about = "Profile datasets into constraints and verify data against them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile a dataset and save the discovered constraints
    Profile {
        /// Path to the dataset (CSV with a header row)
        dataset: String,

        /// Output file for the constraints (.json or .csv)
        #[arg(short, long)]
        output: String,

        #[command(flatten)]
        dataset_args: DatasetArgs,
    },

    /// Verify a dataset against saved constraints
    Verify {
        /// Path to the dataset (CSV with a header row)
        dataset: String,

        /// Path to the constraints file (.json or .csv)
        constraints: String,

        /// Write the violating rows to this CSV file
        #[arg(long)]
        violations: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        dataset_args: DatasetArgs,
    },

    /// Print a constraints file
    Show {
        /// Path to the constraints file (.json or .csv)
        constraints: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Profile {
            dataset,
            output,
            dataset_args,
        } => commands::profile::execute(&dataset, &output, &dataset_args),

        Commands::Verify {
            dataset,
            constraints,
            violations,
            format,
            dataset_args,
        } => commands::verify::execute(
            &dataset,
            &constraints,
            violations.as_deref(),
            format,
            &dataset_args,
        ),

        Commands::Show {
            constraints,
            format,
        } => commands::show::execute(&constraints, format),
    }
}
