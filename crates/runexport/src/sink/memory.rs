//! In-memory export sink for testing.

use std::sync::Mutex;

use crate::error::Result;
use crate::export::{ExportFormat, ExportRow};

use super::ExportSink;

/// One recorded sink invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkCall {
    /// File name with extension, e.g. `runs.csv`.
    pub file_name: String,
    /// MIME type of the would-be artifact.
    pub mime: String,
    /// The rows that were dispatched.
    pub rows: Vec<ExportRow>,
}

/// Sink that records every call instead of producing a file.
#[derive(Debug, Default)]
pub struct MemorySink {
    calls: Mutex<Vec<SinkCall>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls, in invocation order.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ExportSink for MemorySink {
    fn write(&self, rows: &[ExportRow], file_name: &str, format: ExportFormat) -> Result<()> {
        self.calls.lock().unwrap().push(SinkCall {
            file_name: format.file_name(file_name),
            mime: format.mime().to_string(),
            rows: rows.to_vec(),
        });
        Ok(())
    }
}
