//! Language model ports
//!
//! [`Summarizer`] condenses search records into prose and restructures it;
//! [`Narrator`] rewrites prose as a short first-person spoken message.
//! The `Disabled*` implementations stand in when no API credential is
//! configured and always produce empty output.

use async_trait::async_trait;
use sales_intel_domain::SearchRecord;
use thiserror::Error;

/// Errors that can occur during a language model call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Transport(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse API response: {0}")]
    Decode(String),

    #[error("API returned no content")]
    EmptyResponse,
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `records` as an answer to the user's `query`
    async fn summarize(&self, query: &str, records: &[SearchRecord]) -> Result<String, LlmError>;

    /// Restructure a summary into headed, numbered markdown
    async fn format(&self, summary: &str) -> Result<String, LlmError>;
}

#[async_trait]
pub trait Narrator: Send + Sync {
    /// Rewrite a summary as a spoken-style script (under ~200 words)
    async fn narrate(&self, summary: &str) -> Result<String, LlmError>;
}

/// Summarizer used when summarization is switched off
pub struct DisabledSummarizer;

#[async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(&self, _query: &str, _records: &[SearchRecord]) -> Result<String, LlmError> {
        Ok(String::new())
    }

    async fn format(&self, summary: &str) -> Result<String, LlmError> {
        Ok(summary.to_string())
    }
}

/// Narrator used when summarization is switched off
pub struct DisabledNarrator;

#[async_trait]
impl Narrator for DisabledNarrator {
    async fn narrate(&self, _summary: &str) -> Result<String, LlmError> {
        Ok(String::new())
    }
}
