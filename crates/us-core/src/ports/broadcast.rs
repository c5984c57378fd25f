//! Cross-tab broadcast port
//!
//! Models the browser BroadcastChannel: a same-origin publish/subscribe bus
//! shared by every tab of the user's session. Messages carry the whole
//! clipboard value and are authoritative, last-message-wins; there is no
//! sequencing because only one thing is staged at a time and polling
//! re-converges stragglers within one interval.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::staging::ClipboardStatus;

#[async_trait]
pub trait ClipboardBroadcastPort: Send + Sync {
    /// Publish a clipboard value to every other subscriber on the channel.
    async fn publish(&self, status: ClipboardStatus) -> Result<()>;

    /// Subscribe to clipboard values published by any tab, including this
    /// one's own publishes looping back.
    async fn subscribe(&self) -> Result<broadcast::Receiver<ClipboardStatus>>;
}
