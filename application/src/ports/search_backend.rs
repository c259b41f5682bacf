//! Search backend port
//!
//! Defines the interface for the collaborator that turns a query into
//! records. Implementations live in the infrastructure layer (remote HTTP
//! backend, local mock dataset).

use async_trait::async_trait;
use sales_intel_domain::{SearchOutcome, SearchRequest};
use thiserror::Error;

/// Errors that can occur while searching
///
/// Transport failures, backend-reported failures and undecodable bodies are
/// kept apart so callers can tell "could not reach it" from "it said no".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Transport(String),

    /// Non-success status; `message` is the backend's own `message` or
    /// `error` field when it sent one.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Failed to parse search response: {0}")]
    Decode(String),

    #[error("Search dataset unavailable: {0}")]
    Dataset(String),
}

impl SearchError {
    /// Backend error with the default message for a bare status code
    pub fn status(status: u16) -> Self {
        SearchError::Backend {
            status,
            message: format!("HTTP error! status: {}", status),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, SearchError::Transport(_))
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, SearchError::Backend { .. })
    }
}

/// Collaborator that answers search requests
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Short name used in logs ("remote", "mock")
    fn name(&self) -> &str;

    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError>;
}
