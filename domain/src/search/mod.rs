//! Search requests, results and the local matching rule for offline data.

mod record;

pub use record::{RecordKind, SearchRecord};

use serde::{Deserialize, Serialize};

/// Default number of results requested from a backend.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Queries with more keywords than this match on ANY keyword instead of ALL.
const STRICT_MATCH_MAX_KEYWORDS: usize = 2;

/// Body sent to a search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub max_results: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// What a backend returned for one request.
///
/// Some backends summarize server-side; `summary` carries that text when
/// present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub records: Vec<SearchRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Backend data sources consulted, e.g. `gmail_search`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools_used: Vec<String>,
}

impl SearchOutcome {
    pub fn new(records: Vec<SearchRecord>) -> Self {
        Self {
            records,
            summary: None,
            tools_used: Vec::new(),
        }
    }

    /// Record the backend's data sources, dropping blank names.
    pub fn with_tools_used<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools_used = tools
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.trim().is_empty())
            .collect();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        self.summary = if summary.trim().is_empty() {
            None
        } else {
            Some(summary)
        };
        self
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.summary.is_none()
    }
}

/// Filter records by substring matches of the query's whitespace tokens.
///
/// Short queries (one or two tokens) need every token to appear in the
/// record; longer ones are treated as natural language and need any token.
/// A query without tokens matches nothing.
pub fn filter_records<'a, I>(records: I, query: &str) -> Vec<SearchRecord>
where
    I: IntoIterator<Item = &'a SearchRecord>,
{
    let lowered = query.to_lowercase();
    let keywords: Vec<&str> = lowered.split_whitespace().collect();
    if keywords.is_empty() {
        return Vec::new();
    }

    records
        .into_iter()
        .filter(|record| {
            let text = record.searchable_text();
            if keywords.len() > STRICT_MATCH_MAX_KEYWORDS {
                keywords.iter().any(|k| text.contains(k))
            } else {
                keywords.iter().all(|k| text.contains(k))
            }
        })
        .cloned()
        .collect()
}
