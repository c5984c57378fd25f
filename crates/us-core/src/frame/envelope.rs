use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::FrameWindowId;

/// One inbound `message` event from an embedded frame.
///
/// The envelope pairs the untyped payload with the identity of the window
/// that produced it. The payload is owned by the envelope for the duration
/// of dispatch; bridges project fields into their own state and never
/// retain the raw value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameEnvelope {
    /// Identity of the content window the event came from.
    pub source: FrameWindowId,
    /// The raw postMessage payload.
    pub data: Value,
}

impl FrameEnvelope {
    pub fn new(source: FrameWindowId, data: Value) -> Self {
        Self { source, data }
    }
}
