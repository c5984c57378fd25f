//! In-process broadcast bus.
//!
//! Stands in for the browser BroadcastChannel: every manager subscribed to
//! the same bus instance sees every published clipboard value, including
//! its own publishes looping back. One bus per origin, shared by handle.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

use us_core::ports::ClipboardBroadcastPort;
use us_core::staging::ClipboardStatus;

/// Well-known channel name shared by all tabs of the same origin.
pub const CLIPBOARD_CHANNEL_NAME: &str = "studio_clipboard";

/// Publishes are fire-and-forget; a small buffer is plenty because
/// consumers only care about the latest value.
const CHANNEL_CAPACITY: usize = 16;

pub struct LocalBroadcastBus {
    name: &'static str,
    sender: broadcast::Sender<ClipboardStatus>,
}

impl LocalBroadcastBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            name: CLIPBOARD_CHANNEL_NAME,
            sender,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }
}

impl Default for LocalBroadcastBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardBroadcastPort for LocalBroadcastBus {
    async fn publish(&self, status: ClipboardStatus) -> Result<()> {
        // A send error only means no subscriber is listening right now,
        // which is fine: the next poll re-converges late joiners.
        let _ = self.sender.send(status);
        Ok(())
    }

    async fn subscribe(&self) -> Result<broadcast::Receiver<ClipboardStatus>> {
        Ok(self.sender.subscribe())
    }
}
