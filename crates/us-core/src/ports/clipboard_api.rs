//! Staging API port - abstracts the clipboard backend
//!
//! Both operations return the full `ClipboardStatus` shape; staging is the
//! backend's "last write wins" arbiter, so whatever it returns supersedes
//! any local value.

use anyhow::Result;
use async_trait::async_trait;

use crate::ids::UsageKey;
use crate::staging::ClipboardStatus;

#[async_trait]
pub trait ClipboardApiPort: Send + Sync {
    /// Fetch the current clipboard status for this user.
    async fn fetch_status(&self) -> Result<ClipboardStatus>;

    /// Stage new content onto the clipboard from a content reference key.
    async fn stage_content(&self, usage_key: &UsageKey) -> Result<ClipboardStatus>;
}
