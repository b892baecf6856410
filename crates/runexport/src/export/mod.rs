//! Export construction: format selection, field formatting, flag flattening,
//! and the model that ties them together.

mod flatten;
mod format;
mod formatter;
mod model;

pub use flatten::{discover_detectors, render_flag_cell};
pub use format::ExportFormat;
pub use formatter::FormatterRegistry;
pub use model::{ExportFailure, ExportModel, ExportOutcome, ExportRow};
