use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::StagingStatus;

/// The only staging purpose this core deals with.
pub const CLIPBOARD_PURPOSE: &str = "clipboard";

/// One staged content record as reported by the staging API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedContent {
    pub id: i64,
    pub user_id: i64,
    pub created: DateTime<Utc>,
    pub purpose: String,
    pub status: StagingStatus,

    /// Content type tag of the staged item, e.g. "vertical" or "html".
    pub block_type: String,
    pub block_type_display: String,

    pub olx_url: String,
    pub display_name: String,
}

/// The single, process-wide clipboard resource, replicated across tabs.
///
/// At most one value is current per user session; every mutation comes from
/// a staging response, a polling refresh, or a broadcast from another tab,
/// and all tabs converge within one polling interval.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClipboardStatus {
    /// The staged entry, or `None` when nothing has been copied yet.
    pub content: Option<StagedContent>,

    #[serde(default)]
    pub source_usage_key: String,
    #[serde(default)]
    pub source_context_title: String,
    #[serde(default)]
    pub source_edit_url: String,
}

impl ClipboardStatus {
    /// True while the staged entry is still being assembled server-side,
    /// i.e. while polling must continue.
    pub fn is_loading(&self) -> bool {
        self.content
            .as_ref()
            .is_some_and(|content| content.status.is_loading())
    }

    pub fn block_type(&self) -> Option<&str> {
        self.content
            .as_ref()
            .map(|content| content.block_type.as_str())
            .filter(|block_type| !block_type.is_empty())
    }
}
