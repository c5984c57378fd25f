//! Embedded frame domain: inbound message protocol and per-frame state.

pub mod envelope;
pub mod message;
pub mod state;

pub use envelope::FrameEnvelope;
pub use message::{FrameMessage, FrameMessageError};
pub use state::FrameState;
