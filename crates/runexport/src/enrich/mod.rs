//! Record enrichment: attaching remotely fetched QC flags before export.
//!
//! The enrichment step is an injectable capability rather than a subclass
//! override: [`NoopEnricher`] passes records through untouched, while
//! [`RemoteEnricher`] replaces each record's flags with the result of a
//! per-record lookup against a [`FlagSource`].

mod http;
mod mock;
mod remote;

use async_trait::async_trait;
use thiserror::Error;

use crate::data::Record;

pub use http::HttpFlagSource;
pub use mock::MockFlagSource;
pub use remote::{EnrichConfig, FlagSource, FlagSourceError, RemoteEnricher};

/// Batch-level enrichment failure. Aborts the whole export.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EnrichError(pub String);

/// The enrichment seam of the export pipeline.
#[async_trait]
pub trait RecordEnricher: Send + Sync {
    /// Enrich a batch of records before formatting.
    ///
    /// Returning `Err` aborts the export; per-record problems should be
    /// resolved inside the implementation instead.
    async fn enrich(&self, records: Vec<Record>) -> Result<Vec<Record>, EnrichError>;

    /// Set the context scoping remote lookups, e.g. a data-pass id.
    ///
    /// Takes effect on the next export. No-op for enrichers without a
    /// remote context.
    fn set_context_id(&self, _context_id: &str) {}

    /// Clear the remote lookup context. No-op where setting one is.
    fn clear_context_id(&self) {}
}

/// Enricher that leaves records exactly as they came from the source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnricher;

#[async_trait]
impl RecordEnricher for NoopEnricher {
    async fn enrich(&self, records: Vec<Record>) -> Result<Vec<Record>, EnrichError> {
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QcFlag;

    #[tokio::test]
    async fn test_noop_keeps_existing_flags() {
        let records = vec![
            Record::new()
                .with_field("runNumber", 1)
                .with_flag(QcFlag::new("TPC", "BAD", 10, 20)),
        ];

        let enriched = NoopEnricher.enrich(records.clone()).await.unwrap();
        assert_eq!(enriched, records);
    }
}
