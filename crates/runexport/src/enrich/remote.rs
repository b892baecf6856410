//! Remote flag lookup and the fetch-and-merge enricher.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::{QcFlag, Record};

use super::{EnrichError, RecordEnricher};

/// Default page size for per-record flag lookups.
const DEFAULT_PAGE_LIMIT: usize = 1000;

/// Default field carrying the record identifier sent to the flag source.
const DEFAULT_ID_FIELD: &str = "runNumber";

/// Failure of one remote flag lookup.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct FlagSourceError(pub String);

/// Remote source of QC flags.
///
/// One call fetches the flags for one record, scoped by the data-pass
/// context and the record's run number. Implementations may reject; the
/// enricher catches rejections per record.
#[async_trait]
pub trait FlagSource: Send + Sync {
    async fn flags_for(
        &self,
        context_id: &str,
        run_number: i64,
        limit: usize,
    ) -> Result<Vec<QcFlag>, FlagSourceError>;
}

/// Configuration for [`RemoteEnricher`].
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Data-pass identifier scoping the flag lookups. `None` skips
    /// enrichment entirely.
    pub context_id: Option<String>,
    /// Maximum flags fetched per record.
    pub page_limit: usize,
    /// Number of lookups in flight at once. 1 keeps the lookups strictly
    /// sequential; any width preserves per-record failure isolation.
    pub concurrency: usize,
    /// Record field holding the identifier sent to the source.
    pub id_field: String,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            context_id: None,
            page_limit: DEFAULT_PAGE_LIMIT,
            concurrency: 1,
            id_field: DEFAULT_ID_FIELD.to_string(),
        }
    }
}

/// Enricher replacing each record's flags with remotely fetched ones.
///
/// A failed lookup degrades to an empty flag list for that record only; the
/// rest of the batch is unaffected. A record whose identifier field is
/// missing or non-integer fails the whole batch, since no lookup can even
/// be formed for it.
pub struct RemoteEnricher {
    source: Arc<dyn FlagSource>,
    // Reconfigurable between exports through the shared `RecordEnricher`
    // handle, so it lives behind its own lock rather than in the config.
    context_id: Mutex<Option<String>>,
    page_limit: usize,
    concurrency: usize,
    id_field: String,
}

impl RemoteEnricher {
    /// Create an enricher with default configuration (no context id yet).
    pub fn new(source: Arc<dyn FlagSource>) -> Self {
        Self::with_config(source, EnrichConfig::default())
    }

    /// Create with custom configuration. `config.context_id` is the initial
    /// context; it can be changed later via [`RecordEnricher::set_context_id`].
    pub fn with_config(source: Arc<dyn FlagSource>, config: EnrichConfig) -> Self {
        Self {
            source,
            context_id: Mutex::new(config.context_id),
            page_limit: config.page_limit,
            concurrency: config.concurrency,
            id_field: config.id_field,
        }
    }

    /// The currently configured data-pass context id, if any.
    pub fn context_id(&self) -> Option<String> {
        self.context_id.lock().unwrap().clone()
    }

    async fn enrich_one(
        &self,
        context_id: &str,
        record: Record,
    ) -> Result<Record, EnrichError> {
        let run_number = record.integer_field(&self.id_field).ok_or_else(|| {
            EnrichError(format!("Record has no integer '{}' field", self.id_field))
        })?;

        let flags = match self
            .source
            .flags_for(context_id, run_number, self.page_limit)
            .await
        {
            Ok(flags) => flags,
            Err(e) => {
                warn!(run_number, error = %e, "QC flag lookup failed, exporting without flags");
                Vec::new()
            }
        };

        Ok(record.with_flags(flags))
    }
}

#[async_trait]
impl RecordEnricher for RemoteEnricher {
    async fn enrich(&self, records: Vec<Record>) -> Result<Vec<Record>, EnrichError> {
        let Some(context_id) = self.context_id() else {
            return Ok(records);
        };

        debug!(
            context_id = %context_id,
            records = records.len(),
            concurrency = self.concurrency,
            "enriching records with remote QC flags"
        );

        let concurrency = self.concurrency.max(1);
        futures::stream::iter(
            records
                .into_iter()
                .map(|record| self.enrich_one(&context_id, record)),
        )
        .buffered(concurrency)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect()
    }

    fn set_context_id(&self, context_id: &str) {
        *self.context_id.lock().unwrap() = Some(context_id.to_string());
    }

    fn clear_context_id(&self) {
        *self.context_id.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::MockFlagSource;

    fn run(number: i64) -> Record {
        Record::new().with_field("runNumber", number)
    }

    #[tokio::test]
    async fn test_without_context_id_records_pass_through() {
        let source = Arc::new(MockFlagSource::new());
        let enricher = RemoteEnricher::new(source.clone());

        let records = vec![run(1).with_flag(QcFlag::new("TPC", "BAD", 0, 1))];
        let enriched = enricher.enrich(records.clone()).await.unwrap();

        assert_eq!(enriched, records);
        assert_eq!(source.request_count(), 0);
    }

    #[tokio::test]
    async fn test_flags_replace_existing_ones() {
        let source = Arc::new(
            MockFlagSource::new().with_flags(5, vec![QcFlag::new("ITS", "LIMITED", 1, 2)]),
        );
        let enricher = RemoteEnricher::new(source);
        enricher.set_context_id("pass-1");

        let records = vec![run(5).with_flag(QcFlag::new("TPC", "STALE", 0, 1))];
        let enriched = enricher.enrich(records).await.unwrap();

        assert_eq!(enriched[0].qc_flags, vec![QcFlag::new("ITS", "LIMITED", 1, 2)]);
    }

    #[tokio::test]
    async fn test_failed_lookup_degrades_to_empty_flags() {
        let source = Arc::new(
            MockFlagSource::new()
                .with_flags(1, vec![QcFlag::new("TPC", "BAD", 0, 1)])
                .with_failure(2, "service unavailable"),
        );
        let enricher = RemoteEnricher::new(source);
        enricher.set_context_id("pass-1");

        let enriched = enricher.enrich(vec![run(1), run(2)]).await.unwrap();

        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].qc_flags.len(), 1);
        assert!(enriched[1].qc_flags.is_empty());
    }

    #[tokio::test]
    async fn test_missing_identifier_fails_the_batch() {
        let source = Arc::new(MockFlagSource::new());
        let enricher = RemoteEnricher::new(source);
        enricher.set_context_id("pass-1");

        let records = vec![run(1), Record::new().with_field("label", "no id")];
        assert!(enricher.enrich(records).await.is_err());
    }

    #[tokio::test]
    async fn test_context_id_can_be_set_and_cleared_on_shared_handle() {
        let source = Arc::new(MockFlagSource::new().with_flags(1, vec![QcFlag::new("TPC", "BAD", 0, 1)]));
        let enricher: Arc<dyn RecordEnricher> = Arc::new(RemoteEnricher::new(source.clone()));

        let records = vec![run(1)];
        assert!(enricher.enrich(records.clone()).await.unwrap()[0]
            .qc_flags
            .is_empty());

        enricher.set_context_id("pass-2");
        assert_eq!(enricher.enrich(records.clone()).await.unwrap()[0].qc_flags.len(), 1);

        enricher.clear_context_id();
        assert!(enricher.enrich(records).await.unwrap()[0].qc_flags.is_empty());
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn test_lookups_are_scoped_by_context_and_run() {
        let source = Arc::new(MockFlagSource::new());
        let enricher = RemoteEnricher::new(source.clone());
        enricher.set_context_id("LHC24_apass1");

        enricher.enrich(vec![run(10), run(11)]).await.unwrap();

        let requests = source.requests();
        assert_eq!(
            requests,
            vec![
                ("LHC24_apass1".to_string(), 10, 1000),
                ("LHC24_apass1".to_string(), 11, 1000),
            ]
        );
    }
}
