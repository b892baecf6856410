//! Mock flag source for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::data::QcFlag;

use super::remote::{FlagSource, FlagSourceError};

/// Flag source returning scripted responses per run number.
///
/// Runs without a scripted response resolve to an empty flag list. Every
/// request is recorded so tests can assert on scoping and ordering.
#[derive(Debug, Default)]
pub struct MockFlagSource {
    flags: HashMap<i64, Vec<QcFlag>>,
    failures: HashMap<i64, String>,
    requests: Mutex<Vec<(String, i64, usize)>>,
}

impl MockFlagSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful response for a run number.
    pub fn with_flags(mut self, run_number: i64, flags: Vec<QcFlag>) -> Self {
        self.flags.insert(run_number, flags);
        self
    }

    /// Script a rejection for a run number.
    pub fn with_failure(mut self, run_number: i64, message: impl Into<String>) -> Self {
        self.failures.insert(run_number, message.into());
        self
    }

    /// Every `(context_id, run_number, limit)` request seen so far.
    pub fn requests(&self) -> Vec<(String, i64, usize)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests seen so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl FlagSource for MockFlagSource {
    async fn flags_for(
        &self,
        context_id: &str,
        run_number: i64,
        limit: usize,
    ) -> Result<Vec<QcFlag>, FlagSourceError> {
        self.requests
            .lock()
            .unwrap()
            .push((context_id.to_string(), run_number, limit));

        if let Some(message) = self.failures.get(&run_number) {
            return Err(FlagSourceError(message.clone()));
        }
        Ok(self.flags.get(&run_number).cloned().unwrap_or_default())
    }
}
