use serde::Serialize;

use super::content::ClipboardStatus;
use super::status::StagingStatus;

/// Container block types: they hold other content and can only be pasted
/// into the matching level of the course tree, never as leaf components.
pub const STRUCTURAL_BLOCK_TYPES: [&str; 3] = ["vertical", "sequential", "chapter"];

/// Paste affordance flags, a pure function of the current clipboard value.
///
/// These gate paste buttons rendered elsewhere; the sync manager never
/// performs the paste itself, it only decides whether pasting is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PasteEligibility {
    /// The user may paste something, somewhere.
    pub is_pasteable: bool,

    /// The staged item is a unit and may be pasted into a subsection.
    pub show_paste_unit: bool,

    /// The staged item is a subsection and may be pasted into a section.
    pub show_paste_subsection: bool,

    /// The staged item is a leaf component and may be pasted into a unit.
    pub show_paste_xblock: bool,
}

impl PasteEligibility {
    pub fn derive(status: &ClipboardStatus, can_edit: bool) -> Self {
        let is_pasteable = can_edit
            && status
                .content
                .as_ref()
                .is_some_and(|content| content.status != StagingStatus::Expired);
        let block_type = status.block_type();

        Self {
            is_pasteable,
            show_paste_unit: is_pasteable && block_type == Some("vertical"),
            show_paste_subsection: is_pasteable && block_type == Some("sequential"),
            show_paste_xblock: is_pasteable
                && block_type
                    .is_some_and(|block_type| !STRUCTURAL_BLOCK_TYPES.contains(&block_type)),
        }
    }
}
