//! Notification port - surfaces staging progress as user-visible toasts.

use anyhow::Result;
use async_trait::async_trait;

use crate::staging::StagingNotice;

#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn notify(&self, notice: StagingNotice) -> Result<()>;
}
