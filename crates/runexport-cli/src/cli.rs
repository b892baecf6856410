//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use runexport::ExportFormat;

/// Runexport: export run records with QC flags to CSV or JSON
#[derive(Parser)]
#[command(name = "runexport")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export a dataset file to a CSV or JSON artifact
    Export {
        /// Path to the dataset (JSON array of run records)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Fields to export, in output order
        #[arg(short = 'F', long, value_delimiter = ',', required = true)]
        fields: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: FormatChoice,

        /// Directory the artifact is written to
        #[arg(short, long, default_value = "exports")]
        output_dir: PathBuf,

        /// Artifact name without extension (default: runs-<timestamp>)
        #[arg(short, long)]
        name: Option<String>,

        /// Base URL of a QC flag service for remote enrichment
        #[arg(long)]
        flag_service: Option<String>,

        /// Data-pass identifier scoping the flag lookups
        #[arg(long, requires = "flag_service")]
        data_pass: Option<String>,

        /// Concurrent flag lookups during enrichment
        #[arg(long, default_value = "1")]
        concurrency: usize,
    },
}

/// Output format choice.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatChoice {
    Json,
    Csv,
}

impl From<FormatChoice> for ExportFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Json => ExportFormat::Json,
            FormatChoice::Csv => ExportFormat::Csv,
        }
    }
}
