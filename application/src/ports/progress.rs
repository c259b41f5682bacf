//! Progress notification port
//!
//! Defines the interface for reporting progress through the dispatch
//! sequence.

use sales_intel_domain::{DispatchStage, RequestId};

/// Callback for progress updates during a dispatch
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain lines, nothing).
pub trait DispatchProgress: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: DispatchStage);

    /// Called when a stage finishes; `success` is false for degraded stages
    fn on_stage_complete(&self, stage: DispatchStage, success: bool);

    /// Called when a newer dispatch made this one obsolete
    fn on_superseded(&self, _request_id: RequestId) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DispatchProgress for NoProgress {
    fn on_stage_start(&self, _stage: DispatchStage) {}
    fn on_stage_complete(&self, _stage: DispatchStage, _success: bool) {}
}
