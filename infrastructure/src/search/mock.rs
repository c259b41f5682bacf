//! Offline search over a local JSON dataset.

use async_trait::async_trait;
use sales_intel_application::ports::search_backend::{SearchBackend, SearchError};
use sales_intel_domain::{SearchOutcome, SearchRecord, SearchRequest, filter_records};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Dataset sections, searched in this order
pub const DATASET_BUCKETS: &[&str] = &["gmail", "outlook", "calendar", "xero", "quickbooks"];

/// Search backend answering from a mock dataset
///
/// The dataset is an object whose bucket keys hold arrays of records.
/// Matching follows [`filter_records`]; hits are tagged with their bucket.
pub struct MockSearchBackend {
    buckets: Vec<(&'static str, Vec<SearchRecord>)>,
}

impl MockSearchBackend {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SearchError::Dataset(format!("{}: {}", path.display(), e)))?;
        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| SearchError::Dataset(format!("{}: {}", path.display(), e)))?;
        let backend = Self::from_value(&value);
        info!(
            "Loaded mock dataset {} ({} records)",
            path.display(),
            backend.len()
        );
        Ok(backend)
    }

    /// Build from an in-memory dataset. Missing or non-array buckets are empty.
    pub fn from_value(dataset: &Value) -> Self {
        let buckets = DATASET_BUCKETS
            .iter()
            .map(|bucket| {
                let records = dataset
                    .get(*bucket)
                    .and_then(Value::as_array)
                    .map(|items| items.iter().cloned().map(SearchRecord::from_value).collect())
                    .unwrap_or_default();
                (*bucket, records)
            })
            .collect();
        Self { buckets }
    }

    /// Total number of records across buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let records = self
            .buckets
            .iter()
            .flat_map(|(bucket, records)| {
                filter_records(records, &request.query)
                    .into_iter()
                    .map(move |record| record.with_source(bucket))
            })
            .collect();
        Ok(SearchOutcome::new(records))
    }
}
