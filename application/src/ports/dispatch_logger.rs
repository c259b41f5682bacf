//! Port for structured dispatch logging.
//!
//! Defines the [`DispatchLogger`] trait for recording dispatch events
//! (query sent, records found, summary and narration produced, audio
//! synthesized, failures) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures each
//! dispatch in a machine-readable format (JSONL).

use sales_intel_domain::RequestId;
use serde_json::Value;

/// A structured dispatch event for logging.
pub struct DispatchEvent {
    /// Event type identifier (e.g., "dispatch_started", "search_completed").
    pub event_type: &'static str,
    pub request_id: RequestId,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl DispatchEvent {
    pub fn new(event_type: &'static str, request_id: RequestId, payload: Value) -> Self {
        Self {
            event_type,
            request_id,
            payload,
        }
    }
}

/// Port for logging dispatch events to a structured log.
///
/// `log` is synchronous and infallible; logging failures are ignored.
pub trait DispatchLogger: Send + Sync {
    fn log(&self, event: DispatchEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoDispatchLogger;

impl DispatchLogger for NoDispatchLogger {
    fn log(&self, _event: DispatchEvent) {}
}
