//! Frame messenger port
//!
//! Outbound half of the frame boundary: post a message into one embedded
//! frame's content window. Implementations hold the window handle; the
//! bridge only decides what to send.

use anyhow::Result;
use serde_json::Value;

pub trait FrameMessengerPort: Send + Sync {
    fn post(&self, data: Value) -> Result<()>;
}
