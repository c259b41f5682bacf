//! Remote search backend over HTTP.

use async_trait::async_trait;
use sales_intel_application::ports::search_backend::{SearchBackend, SearchError};
use sales_intel_domain::{SearchOutcome, SearchRecord, SearchRequest};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// POSTs `{"query", "maxResults"}` to a search endpoint.
pub struct HttpSearchBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSearchBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    fn name(&self) -> &str {
        "remote"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        debug!("POST {} query={:?}", self.endpoint, request.query);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(backend_error(status.as_u16(), &body));
        }

        parse_search_body(&body)
    }
}

/// Error for a non-success response: the body's `message`, then its
/// `error` (string or `{ "message" }`), else the bare status.
fn backend_error(status: u16, body: &str) -> SearchError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.get("message")
            .and_then(Value::as_str)
            .or_else(|| v.get("error").and_then(Value::as_str))
            .or_else(|| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
            })
    });

    match message {
        Some(message) if !message.trim().is_empty() => SearchError::Backend {
            status,
            message: message.to_string(),
        },
        _ => SearchError::status(status),
    }
}

/// Accepts the envelope `{"result":{"data":{"messages":[...]}}}`, a bare
/// array, or an object carrying `summary` plus `messages`/`results`.
/// Objects may also list their data sources in `toolsUsed`.
fn parse_search_body(body: &str) -> Result<SearchOutcome, SearchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SearchError::Decode(e.to_string()))?;

    let outcome = match value {
        Value::Array(items) => SearchOutcome::new(to_records(items)),
        Value::Object(ref map) => {
            let items = value
                .pointer("/result/data/messages")
                .or_else(|| map.get("messages"))
                .or_else(|| map.get("results"))
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let tools = map
                .get("toolsUsed")
                .and_then(Value::as_array)
                .map(|tools| {
                    tools
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            let outcome = SearchOutcome::new(to_records(items)).with_tools_used(tools);
            match map.get("summary").and_then(Value::as_str) {
                Some(summary) => outcome.with_summary(summary),
                None => outcome,
            }
        }
        other => {
            return Err(SearchError::Decode(format!(
                "expected an object or array, got {}",
                other
            )));
        }
    };
    Ok(outcome)
}

fn to_records(items: Vec<Value>) -> Vec<SearchRecord> {
    items.into_iter().map(SearchRecord::from_value).collect()
}
