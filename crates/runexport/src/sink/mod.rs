//! Export sinks: where finished rows are materialized.

mod file;
mod memory;

use crate::error::Result;
use crate::export::{ExportFormat, ExportRow};

pub use file::FileSink;
pub use memory::{MemorySink, SinkCall};

/// Destination for a finished export.
///
/// Receives the flat rows, the file name stem, and the selected format; the
/// sink derives extension and MIME type from the format. Implementations
/// must be thread-safe (Send + Sync) so a model can be shared across an
/// async host.
pub trait ExportSink: Send + Sync {
    /// Materialize one export artifact.
    fn write(&self, rows: &[ExportRow], file_name: &str, format: ExportFormat) -> Result<()>;
}
