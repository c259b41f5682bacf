//! Result of one dispatch sequence

use crate::core::request::RequestId;
use crate::keyword::KeywordSet;
use crate::playback::AudioClip;
use crate::search::SearchRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stages of the dispatch sequence, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStage {
    Extract,
    Search,
    Summarize,
    Format,
    Narrate,
    Synthesize,
    Play,
}

impl DispatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStage::Extract => "extract",
            DispatchStage::Search => "search",
            DispatchStage::Summarize => "summarize",
            DispatchStage::Format => "format",
            DispatchStage::Narrate => "narrate",
            DispatchStage::Synthesize => "synthesize",
            DispatchStage::Play => "play",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DispatchStage::Extract => "Extracting keywords",
            DispatchStage::Search => "Searching",
            DispatchStage::Summarize => "Summarizing",
            DispatchStage::Format => "Formatting summary",
            DispatchStage::Narrate => "Writing narration",
            DispatchStage::Synthesize => "Synthesizing speech",
            DispatchStage::Play => "Starting playback",
        }
    }
}

impl std::fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything one dispatch produced (Entity, identified by `request_id`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub request_id: RequestId,
    /// The query as typed by the user
    pub query: String,
    /// The query actually sent to the search backend
    pub sent_query: String,
    /// Keywords, when extraction mode was on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<KeywordSet>,
    pub records: Vec<SearchRecord>,
    /// Backend data sources, as reported by the search backend
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools_used: Vec<String>,
    /// Empty when there was nothing to summarize or summarization is disabled
    pub summary: String,
    /// Structured rendition of `summary`; equals `summary` when formatting was skipped
    pub formatted_summary: String,
    pub narration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioClip>,
    /// Where the player saved `audio`, when it saved it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<PathBuf>,
    /// Stages that degraded instead of failing, as user-facing sentences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

impl DispatchOutcome {
    pub fn new(request_id: RequestId, query: impl Into<String>, sent_query: impl Into<String>) -> Self {
        Self {
            request_id,
            query: query.into(),
            sent_query: sent_query.into(),
            keywords: None,
            records: Vec::new(),
            tools_used: Vec::new(),
            summary: String::new(),
            formatted_summary: String::new(),
            narration: String::new(),
            audio: None,
            audio_path: None,
            notices: Vec::new(),
        }
    }

    pub fn has_summary(&self) -> bool {
        !self.summary.trim().is_empty()
    }

    /// Data source names for display, `gmail_search` → `gmail search`
    pub fn data_sources(&self) -> Vec<String> {
        self.tools_used.iter().map(|t| t.replace('_', " ")).collect()
    }

    /// One-line description of the search result
    pub fn status_line(&self) -> String {
        match self.records.len() {
            0 if self.has_summary() => "The backend returned a summary for your query.".to_string(),
            0 => "No emails found for your query.".to_string(),
            1 => "Found 1 data point matching your search.".to_string(),
            n => format!("Found {} data points matching your search.", n),
        }
    }
}
