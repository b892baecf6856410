//! Runexport: export builder for experiment run records with QC flags.
//!
//! Turns an in-memory snapshot of tabular "run" records, each carrying a
//! variable set of detector-grouped quality-control flags, into a CSV or
//! JSON artifact with user-configured field selection and per-field
//! formatting.
//!
//! # Core Principles
//!
//! - **Snapshot-driven**: one read of the items source per export, never a
//!   subscription
//! - **Composable enrichment**: remote flag fetching is an injected step,
//!   not a subclass
//! - **Best-effort lookups**: one failed flag fetch never sinks the batch
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use runexport::{ExportModel, FileSink, FormatterRegistry, InMemorySource, Record};
//!
//! # async fn example() -> runexport::Result<()> {
//! let items = vec![Record::new().with_field("runNumber", 1)];
//!
//! let mut model = ExportModel::new(Arc::new(FileSink::new("exports")));
//! model.set_items_source(Arc::new(InMemorySource::with_items(items)));
//! model.set_selected_fields(["runNumber"]);
//!
//! model.create_export("runs", &FormatterRegistry::new(), None).await?;
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod enrich;
pub mod error;
pub mod export;
pub mod observer;
pub mod sink;

pub use data::{FetchState, InMemorySource, ItemsSource, NamedRef, QcFlag, Record};
pub use enrich::{
    EnrichConfig, EnrichError, FlagSource, FlagSourceError, HttpFlagSource, MockFlagSource,
    NoopEnricher, RecordEnricher, RemoteEnricher,
};
pub use error::{ExportError, Result};
pub use export::{ExportFailure, ExportFormat, ExportModel, ExportOutcome, ExportRow, FormatterRegistry};
pub use observer::{ObserverBus, SubscriptionId};
pub use sink::{ExportSink, FileSink, MemorySink, SinkCall};
