use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Stable identifier of one embedded frame on the host page.
///
/// Matches the `usageId` tag that targeted resize messages carry, which is
/// how many bridges sharing one message stream pick out their own events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(String);

/// Opaque identity of a frame's content window.
///
/// This is the only authentication boundary for inbound frame messages:
/// an envelope is processed only if its source matches the window identity
/// the bridge recorded when the frame was attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameWindowId(String);

impl_id!(FrameId, FrameWindowId);
