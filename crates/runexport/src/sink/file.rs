//! File-backed export sink - CSV and JSON artifacts on disk.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use indexmap::IndexSet;
use serde_json::Value;

use crate::error::{ExportError, Result};
use crate::export::{ExportFormat, ExportRow};

use super::ExportSink;

/// Sink writing export artifacts under a base directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    directory: PathBuf,
}

impl FileSink {
    /// Create a sink rooted at the given directory.
    ///
    /// The directory is created on first write if it does not exist.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn open(&self, file_name: &str) -> Result<BufWriter<File>> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory).map_err(|e| ExportError::Io {
                path: self.directory.clone(),
                source: e,
            })?;
        }

        let path = self.directory.join(file_name);
        let file = File::create(&path).map_err(|e| ExportError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(BufWriter::new(file))
    }

    fn write_csv(&self, rows: &[ExportRow], file_name: &str) -> Result<()> {
        let writer = self.open(file_name)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Header is the ordered union of keys across all rows: rows may be
        // sparse when a selected field is absent on some records. An empty
        // union means no columns at all; the artifact stays empty instead
        // of one blank line per row.
        let headers = header_union(rows);
        if headers.is_empty() {
            return Ok(());
        }
        csv_writer.write_record(&headers)?;

        for row in rows {
            let cells: Vec<String> = headers
                .iter()
                .map(|key| row.get(key).map(render_cell).unwrap_or_default())
                .collect();
            csv_writer.write_record(&cells)?;
        }

        csv_writer.flush().map_err(|e| ExportError::Io {
            path: self.directory.join(file_name),
            source: e,
        })?;
        Ok(())
    }

    fn write_json(&self, rows: &[ExportRow], file_name: &str) -> Result<()> {
        let writer = self.open(file_name)?;
        serde_json::to_writer_pretty(writer, rows)?;
        Ok(())
    }
}

impl ExportSink for FileSink {
    fn write(&self, rows: &[ExportRow], file_name: &str, format: ExportFormat) -> Result<()> {
        let file_name = format.file_name(file_name);
        match format {
            ExportFormat::Csv => self.write_csv(rows, &file_name),
            ExportFormat::Json => self.write_json(rows, &file_name),
        }
    }
}

/// Ordered union of row keys, preserving first-appearance order.
fn header_union(rows: &[ExportRow]) -> Vec<String> {
    let mut headers: IndexSet<String> = IndexSet::new();
    for row in rows {
        for key in row.keys() {
            headers.insert(key.clone());
        }
    }
    headers.into_iter().collect()
}

/// Render one JSON value as a CSV cell.
///
/// Strings are written bare (quoting is the CSV writer's job); everything
/// else uses its compact JSON rendering.
fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
