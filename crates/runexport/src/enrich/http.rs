//! HTTP flag source implementation.
//!
//! Talks to a bookkeeping-style JSON API:
//! `GET {base}/qcFlags?dataPassId=..&runNumber=..&limit=..` returning
//! `{ "items": [ { "detector": {...}, "flagType": {...}, "from": .., "to": .. } ] }`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::data::QcFlag;
use crate::error::{ExportError, Result};

use super::remote::{FlagSource, FlagSourceError};

/// Default request timeout for flag lookups.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Flag source backed by an HTTP QC flag service.
pub struct HttpFlagSource {
    client: Client,
    base_url: String,
}

/// Wire shape of a flag listing response.
#[derive(Debug, Deserialize)]
struct FlagListResponse {
    items: Vec<QcFlag>,
}

impl HttpFlagSource {
    /// Create a source against the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExportError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl FlagSource for HttpFlagSource {
    async fn flags_for(
        &self,
        context_id: &str,
        run_number: i64,
        limit: usize,
    ) -> std::result::Result<Vec<QcFlag>, FlagSourceError> {
        let url = format!("{}/qcFlags", self.base_url);
        let run_number_param = run_number.to_string();
        let limit_param = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("dataPassId", context_id),
                ("runNumber", run_number_param.as_str()),
                ("limit", limit_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FlagSourceError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FlagSourceError(format!(
                "Flag service returned {} for run {}",
                response.status(),
                run_number
            )));
        }

        let listing: FlagListResponse = response
            .json()
            .await
            .map_err(|e| FlagSourceError(format!("Invalid flag listing: {}", e)))?;
        Ok(listing.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let source = HttpFlagSource::new("http://localhost:4000/api/").unwrap();
        assert_eq!(source.base_url, "http://localhost:4000/api");
    }

    #[test]
    fn test_parse_flag_listing() {
        let listing: FlagListResponse = serde_json::from_str(
            r#"{"items":[{"detector":{"name":"TPC"},"flagType":{"name":"BAD"},"from":10,"to":20}]}"#,
        )
        .unwrap();

        assert_eq!(listing.items, vec![QcFlag::new("TPC", "BAD", 10, 20)]);
    }
}
