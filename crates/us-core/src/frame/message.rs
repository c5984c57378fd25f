//! Inbound frame message protocol.
//!
//! Embedded frames talk to the host through untyped postMessage payloads.
//! This module decodes those payloads into a closed tagged union so that
//! dispatch is exhaustive and a new message kind is a compile-time-checked
//! addition rather than another stringly-typed branch.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::ids::FrameId;

/// Wire-level discriminants used by the embedded content runtime.
pub mod wire {
    pub const RESIZE: &str = "resize";
    pub const VIDEO_FULL_SCREEN: &str = "videoFullScreen";
    pub const BLOCK_EVENT: &str = "xblock-event";
    pub const SCROLL_TO_BLOCK: &str = "scrollToXBlock";

    /// Block event methods are namespaced; anything else is not for us.
    pub const BLOCK_EVENT_METHOD_PREFIX: &str = "xblock:";
}

/// A decoded message from an embedded frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameMessage {
    /// The frame reports its rendered height. `usage_id`, when present,
    /// targets one specific bridge among several sharing a message stream.
    Resize {
        height: f64,
        usage_id: Option<FrameId>,
    },

    /// Video playback inside the frame entered or left fullscreen.
    VideoFullScreen { open: bool },

    /// A semantic block event, forwarded to the host's notification callback.
    /// `event_type` is the method name with its `xblock:` prefix stripped;
    /// every field but the method travels verbatim in `args`.
    BlockEvent {
        event_type: String,
        args: Map<String, Value>,
    },

    /// The frame asks the host to smooth-scroll a block region into view.
    ScrollToBlock { offset: f64 },

    /// Bare offset message with no type tag: scroll the host window so the
    /// given frame-relative offset becomes visible.
    Scroll { offset: f64 },
}

#[derive(Debug, Error)]
pub enum FrameMessageError {
    #[error("message payload is not a JSON object")]
    NotAnObject,

    #[error("unknown message type `{0}`")]
    UnknownType(String),

    #[error("message has neither a type tag nor an offset")]
    Unrecognized,

    #[error("malformed `{kind}` message: missing or invalid `{field}`")]
    MalformedPayload {
        kind: &'static str,
        field: &'static str,
    },

    #[error("block event method `{0}` lacks the `xblock:` prefix")]
    ForeignMethod(String),
}

impl FrameMessage {
    /// Decode a raw postMessage payload.
    ///
    /// Callers treat any error as "not a message for us" and drop it;
    /// the variants only exist so the discard can be logged precisely.
    pub fn parse(data: &Value) -> Result<Self, FrameMessageError> {
        let object = data.as_object().ok_or(FrameMessageError::NotAnObject)?;

        match object.get("type").and_then(Value::as_str) {
            Some(wire::RESIZE) => Self::parse_resize(object),
            Some(wire::VIDEO_FULL_SCREEN) => Self::parse_video_full_screen(object),
            Some(wire::BLOCK_EVENT) => Self::parse_block_event(object),
            Some(wire::SCROLL_TO_BLOCK) => object
                .get("offset")
                .and_then(Value::as_f64)
                .map(|offset| FrameMessage::ScrollToBlock { offset })
                .ok_or(FrameMessageError::MalformedPayload {
                    kind: wire::SCROLL_TO_BLOCK,
                    field: "offset",
                }),
            Some(other) => Err(FrameMessageError::UnknownType(other.to_string())),
            None => object
                .get("offset")
                .and_then(Value::as_f64)
                .map(|offset| FrameMessage::Scroll { offset })
                .ok_or(FrameMessageError::Unrecognized),
        }
    }

    fn parse_resize(object: &Map<String, Value>) -> Result<Self, FrameMessageError> {
        let payload = object
            .get("payload")
            .and_then(Value::as_object)
            .ok_or(FrameMessageError::MalformedPayload {
                kind: wire::RESIZE,
                field: "payload",
            })?;
        let height = payload.get("height").and_then(Value::as_f64).ok_or(
            FrameMessageError::MalformedPayload {
                kind: wire::RESIZE,
                field: "height",
            },
        )?;
        let usage_id = payload
            .get("usageId")
            .and_then(Value::as_str)
            .map(FrameId::from);

        Ok(FrameMessage::Resize { height, usage_id })
    }

    fn parse_video_full_screen(object: &Map<String, Value>) -> Result<Self, FrameMessageError> {
        let open = object
            .get("payload")
            .and_then(|payload| payload.get("open"))
            .and_then(Value::as_bool)
            .ok_or(FrameMessageError::MalformedPayload {
                kind: wire::VIDEO_FULL_SCREEN,
                field: "open",
            })?;

        Ok(FrameMessage::VideoFullScreen { open })
    }

    fn parse_block_event(object: &Map<String, Value>) -> Result<Self, FrameMessageError> {
        let method = object.get("method").and_then(Value::as_str).ok_or(
            FrameMessageError::MalformedPayload {
                kind: wire::BLOCK_EVENT,
                field: "method",
            },
        )?;
        let event_type = method
            .strip_prefix(wire::BLOCK_EVENT_METHOD_PREFIX)
            .ok_or_else(|| FrameMessageError::ForeignMethod(method.to_string()))?
            .to_string();

        // Everything except the invocation method travels verbatim,
        // type tag included.
        let args: Map<String, Value> = object
            .iter()
            .filter(|(key, _)| key.as_str() != "method")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(FrameMessage::BlockEvent { event_type, args })
    }
}
