//! Runexport CLI - export run records with QC flags.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "runexport=debug".into()),
            )
            .init();
    }

    let result = match cli.command {
        Commands::Export {
            file,
            fields,
            format,
            output_dir,
            name,
            flag_service,
            data_pass,
            concurrency,
        } => {
            commands::export::run(
                file,
                fields,
                format.into(),
                output_dir,
                name,
                flag_service,
                data_pass,
                concurrency,
            )
            .await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
