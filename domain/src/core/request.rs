//! Request identifiers for dispatch fencing

use serde::{Deserialize, Serialize};

/// Monotonically increasing identifier of one dispatch (Value Object)
///
/// Issued by the dispatcher; a result may only be shown while its id is the
/// latest one issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// Whether `self` was issued after `other`
    pub fn supersedes(self, other: RequestId) -> bool {
        self.0 > other.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
