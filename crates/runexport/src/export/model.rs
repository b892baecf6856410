//! The export view-model and its construction algorithm.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::data::{FetchState, ItemsSource, Record};
use crate::enrich::{NoopEnricher, RecordEnricher};
use crate::error::Result;
use crate::observer::{ObserverBus, SubscriptionId};
use crate::sink::ExportSink;

use super::flatten::{discover_detectors, render_flag_cell};
use super::format::ExportFormat;
use super::formatter::FormatterRegistry;

/// One flat output row: field and detector columns in render order.
pub type ExportRow = IndexMap<String, Value>;

/// Structured failure surfaced to the `on_error` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub title: String,
    pub detail: String,
}

impl ExportFailure {
    /// The dataset snapshot held no exportable items.
    pub fn no_data() -> Self {
        Self {
            title: "No data found".to_string(),
            detail: "No items were found with the provided filters".to_string(),
        }
    }

    /// The enrichment phase failed as a whole.
    pub fn flags_fetch_failed() -> Self {
        Self {
            title: "QC flags fetch failed".to_string(),
            detail: "Unable to fetch QC flags for export".to_string(),
        }
    }
}

/// How a `create_export` invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// An artifact was dispatched to the sink.
    Completed,
    /// The export was skipped without touching the sink.
    Skipped(ExportFailure),
}

/// View-model turning an items snapshot into a CSV or JSON export artifact.
///
/// Owns the export configuration (ordered field selection, output format)
/// and the collaborator seams: a rebindable [`ItemsSource`], an injectable
/// [`RecordEnricher`] (no-op by default), and the [`ExportSink`] that
/// materializes the artifact. Configuration survives items-source rebinding
/// and any failed export; the model stays usable throughout.
pub struct ExportModel {
    items_source: Option<Arc<dyn ItemsSource>>,
    selected_fields: Vec<String>,
    selected_format: ExportFormat,
    enricher: Arc<dyn RecordEnricher>,
    sink: Arc<dyn ExportSink>,
    observers: ObserverBus,
}

impl ExportModel {
    /// Create a model dispatching to the given sink.
    ///
    /// Starts with no items source, no selected fields, the JSON format
    /// default, and no enrichment.
    pub fn new(sink: Arc<dyn ExportSink>) -> Self {
        Self {
            items_source: None,
            selected_fields: Vec::new(),
            selected_format: ExportFormat::default(),
            enricher: Arc::new(NoopEnricher),
            sink,
            observers: ObserverBus::new(),
        }
    }

    /// Replace the enrichment step.
    pub fn with_enricher(mut self, enricher: Arc<dyn RecordEnricher>) -> Self {
        self.enricher = enricher;
        self
    }

    /// Rebind the items source. No validation; takes effect on the next
    /// export. Configuration is preserved across rebinding.
    pub fn set_items_source(&mut self, source: Arc<dyn ItemsSource>) {
        self.items_source = Some(source);
    }

    pub fn selected_format(&self) -> ExportFormat {
        self.selected_format
    }

    /// Set the output format. Fires both notification channels.
    pub fn set_selected_format(&mut self, format: ExportFormat) {
        self.selected_format = format;
        self.observers.notify_change();
        self.observers.notify_visual_change();
    }

    pub fn selected_fields(&self) -> &[String] {
        &self.selected_fields
    }

    /// Replace the ordered field selection atomically. Accepts any finite
    /// iterable of string-likes so UI selection collections can be passed
    /// directly. Fires both notification channels.
    pub fn set_selected_fields<I, S>(&mut self, selection: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_fields = selection.into_iter().map(Into::into).collect();
        self.observers.notify_change();
        self.observers.notify_visual_change();
    }

    /// Set the data-pass context id scoping remote flag lookups.
    ///
    /// Delegates to the wired enricher; a no-op when the enricher has no
    /// remote context. Takes effect on the next export.
    pub fn set_context_id(&mut self, context_id: impl Into<String>) {
        self.enricher.set_context_id(&context_id.into());
    }

    /// Clear the remote lookup context, disabling enrichment.
    pub fn clear_context_id(&mut self) {
        self.enricher.clear_context_id();
    }

    /// Subscribe to the general change channel.
    pub fn on_change(&mut self, callback: impl Fn() + Send + 'static) -> SubscriptionId {
        self.observers.on_change(callback)
    }

    /// Subscribe to the visual change channel.
    pub fn on_visual_change(&mut self, callback: impl Fn() + Send + 'static) -> SubscriptionId {
        self.observers.on_visual_change(callback)
    }

    /// Detach a previously registered observer.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.observers.unsubscribe(id);
    }

    /// Build and dispatch an export artifact named `<file_name>.<ext>`.
    ///
    /// Reads one snapshot from the items source, enriches the records,
    /// projects and formats the selected fields, flattens QC flags into one
    /// column per discovered detector, and hands the rows to the sink.
    ///
    /// A snapshot that is not a non-empty success, or a batch-level
    /// enrichment failure, skips the export: `on_error` (if supplied) gets
    /// the structured failure and the returned outcome carries it too.
    /// Only sink failures surface as `Err`.
    pub async fn create_export(
        &self,
        file_name: &str,
        formatters: &FormatterRegistry,
        on_error: Option<&mut dyn FnMut(&ExportFailure)>,
    ) -> Result<ExportOutcome> {
        let snapshot = match &self.items_source {
            Some(source) => source.snapshot(),
            None => FetchState::NotAsked,
        };

        let records = match snapshot {
            FetchState::Success(items) if !items.is_empty() => items,
            _ => {
                debug!(file_name, "export skipped: no items in snapshot");
                return Ok(self.skip(ExportFailure::no_data(), true, on_error));
            }
        };

        let records = match self.enricher.enrich(records).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "export aborted: enrichment failed");
                return Ok(self.skip(ExportFailure::flags_fetch_failed(), false, on_error));
            }
        };

        let rows = self.build_rows(&records, formatters);
        debug!(
            file_name,
            rows = rows.len(),
            format = %self.selected_format,
            "dispatching export to sink"
        );
        self.sink.write(&rows, file_name, self.selected_format)?;
        Ok(ExportOutcome::Completed)
    }

    fn skip(
        &self,
        failure: ExportFailure,
        notify: bool,
        on_error: Option<&mut dyn FnMut(&ExportFailure)>,
    ) -> ExportOutcome {
        if let Some(callback) = on_error {
            callback(&failure);
        }
        if notify {
            self.observers.notify_change();
        }
        ExportOutcome::Skipped(failure)
    }

    fn build_rows(&self, records: &[Record], formatters: &FormatterRegistry) -> Vec<ExportRow> {
        let detectors = discover_detectors(records);

        records
            .iter()
            .map(|record| {
                let mut row = ExportRow::new();

                // Projection is an intersection: selected keys absent from
                // this record are dropped, in configured order.
                for field in &self.selected_fields {
                    if let Some(value) = record.field(field) {
                        row.insert(field.clone(), formatters.format(field, value, record));
                    }
                }

                // One column per discovered detector, for every record,
                // in discovery order.
                for detector in &detectors {
                    row.insert(
                        detector.clone(),
                        Value::String(render_flag_cell(record, detector)),
                    );
                }
                row
            })
            .collect()
    }
}
