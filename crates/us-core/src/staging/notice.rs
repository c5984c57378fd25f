use std::fmt::{Display, Formatter};

/// User-visible progress of a staging request, surfaced as toasts by the
/// notification collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingNotice {
    /// Staging request issued.
    Copying,
    /// Staging completed; the clipboard holds the new content.
    Copied,
    /// Staging failed; the previous clipboard value is untouched.
    CopyFailed,
}

impl Display for StagingNotice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::Copying => "Copying",
            Self::Copied => "Copied to clipboard",
            Self::CopyFailed => "Failed to copy to clipboard",
        };
        write!(f, "{message}")
    }
}
