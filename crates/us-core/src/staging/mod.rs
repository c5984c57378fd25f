//! Clipboard staging domain: the single shared "what's on the clipboard"
//! resource and the paste-eligibility flags derived from it.

pub mod content;
pub mod notice;
pub mod paste;
pub mod status;

pub use content::{ClipboardStatus, StagedContent, CLIPBOARD_PURPOSE};
pub use notice::StagingNotice;
pub use paste::{PasteEligibility, STRUCTURAL_BLOCK_TYPES};
pub use status::StagingStatus;
