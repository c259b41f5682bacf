//! Latest-request-wins fencing for concurrent dispatches.
//!
//! Every dispatch takes a [`DispatchTicket`] from the [`RequestFence`].
//! Taking a ticket cancels the previous ticket's token, and only
//! the holder of the latest ticket may put its outcome on display.

use sales_intel_domain::{DispatchOutcome, RequestId};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Identity and cancellation handle of one in-flight dispatch.
#[derive(Debug, Clone)]
pub struct DispatchTicket {
    pub id: RequestId,
    token: CancellationToken,
}

impl DispatchTicket {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once a newer ticket has been issued.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

struct FenceState {
    latest: u64,
    token: Option<CancellationToken>,
    shown: Option<DispatchOutcome>,
}

/// Issues ticket ids and holds the outcome currently on display.
///
/// Id assignment, token swap and display share one lock, so an outcome
/// that `apply_if_current` accepts always belongs to the newest ticket.
pub struct RequestFence {
    state: Mutex<FenceState>,
}

impl Default for RequestFence {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestFence {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FenceState {
                latest: 0,
                token: None,
                shown: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FenceState> {
        // A poisoned fence still holds a consistent counter.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Issue the next ticket and cancel the previous one.
    pub fn begin(&self) -> DispatchTicket {
        let mut state = self.lock();
        state.latest += 1;
        let token = CancellationToken::new();
        if let Some(previous) = state.token.replace(token.clone()) {
            previous.cancel();
        }
        DispatchTicket {
            id: RequestId::new(state.latest),
            token,
        }
    }

    pub fn latest(&self) -> RequestId {
        RequestId::new(self.lock().latest)
    }

    /// Show `outcome` if it belongs to the latest ticket. Returns whether it was shown.
    pub fn apply_if_current(&self, outcome: &DispatchOutcome) -> bool {
        let mut state = self.lock();
        if state.latest != outcome.request_id.value() {
            return false;
        }
        state.shown = Some(outcome.clone());
        true
    }

    /// The outcome currently on display.
    pub fn shown(&self) -> Option<DispatchOutcome> {
        self.lock().shown.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase() {
        let fence = RequestFence::new();
        let a = fence.begin();
        let b = fence.begin();
        assert!(b.id.supersedes(a.id));
        assert_eq!(fence.latest(), b.id);
    }

    #[test]
    fn test_begin_cancels_previous() {
        let fence = RequestFence::new();
        let a = fence.begin();
        assert!(!a.is_cancelled());
        let b = fence.begin();
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
    }

    #[test]
    fn test_apply_rejects_stale() {
        let fence = RequestFence::new();
        let a = fence.begin();
        let b = fence.begin();

        assert!(!fence.apply_if_current(&DispatchOutcome::new(a.id, "old", "old")));
        assert!(fence.shown().is_none());

        assert!(fence.apply_if_current(&DispatchOutcome::new(b.id, "new", "new")));
        assert_eq!(fence.shown().map(|o| o.query), Some("new".to_string()));
    }
}
