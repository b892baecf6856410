//! Export command - build an artifact from a dataset file.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;

use runexport::{
    EnrichConfig, ExportFormat, ExportModel, ExportOutcome, FileSink, FormatterRegistry,
    HttpFlagSource, InMemorySource, Record, RemoteEnricher,
};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    file: PathBuf,
    fields: Vec<String>,
    format: ExportFormat,
    output_dir: PathBuf,
    name: Option<String>,
    flag_service: Option<String>,
    data_pass: Option<String>,
    concurrency: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let records: Vec<Record> = serde_json::from_reader(BufReader::new(File::open(&file)?))?;
    println!(
        "{} {} ({} records)",
        "Exporting".cyan().bold(),
        file.display().to_string().white(),
        records.len()
    );

    let mut model = ExportModel::new(Arc::new(FileSink::new(&output_dir)));

    if let Some(service) = flag_service {
        let source = Arc::new(HttpFlagSource::new(service)?);
        let config = EnrichConfig {
            context_id: data_pass,
            concurrency,
            ..EnrichConfig::default()
        };
        model = model.with_enricher(Arc::new(RemoteEnricher::with_config(source, config)));
    }

    model.set_items_source(Arc::new(InMemorySource::with_items(records)));
    model.set_selected_fields(fields);
    model.set_selected_format(format);

    let name = name.unwrap_or_else(|| format!("runs-{}", Utc::now().format("%Y%m%dT%H%M%S")));

    let mut skip_reason = None;
    let mut on_error = |failure: &runexport::ExportFailure| {
        skip_reason = Some(format!("{}: {}", failure.title, failure.detail));
    };
    let outcome = model
        .create_export(&name, &FormatterRegistry::new(), Some(&mut on_error))
        .await?;

    match outcome {
        ExportOutcome::Completed => {
            let artifact = output_dir.join(format.file_name(&name));
            println!(
                "{} {}",
                "Wrote".green().bold(),
                artifact.display().to_string().white()
            );
        }
        ExportOutcome::Skipped(_) => {
            let reason = skip_reason.unwrap_or_else(|| "export skipped".to_string());
            println!("{} {}", "Skipped".yellow().bold(), reason);
        }
    }

    Ok(())
}
