use serde::{Deserialize, Serialize};

/// Server-side lifecycle of a staged clipboard entry.
///
/// The entry is created in `Loading` by a staging request and transitions
/// asynchronously outside the host's control; clients poll while loading
/// and stop on the first terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagingStatus {
    /// The backend is still assembling the staged content.
    Loading,

    /// Staged and pasteable.
    Ready,

    /// Expired server-side. A legitimate terminal state, not an error;
    /// it simply disables paste affordances.
    Expired,

    /// Staging failed server-side.
    Error,
}

impl StagingStatus {
    /// Check if polling should stop.
    pub fn is_terminal(self) -> bool {
        !self.is_loading()
    }

    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }
}
