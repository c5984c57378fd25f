//! # us-app
//!
//! Application layer of UniStage: the embedded frame bridge, the clipboard
//! synchronization manager, the socket event registry, and the event
//! subscription utility they are all built on, plus the infrastructure
//! adapters for the staging API and the cross-tab broadcast bus.

pub mod adapters;
pub mod bridge;
pub mod clipboard;
pub mod socket;
pub mod subscription;

pub use bridge::{BlockNotification, EmbeddedFrameBridge};
pub use clipboard::ClipboardSyncManager;
pub use socket::{EventRegistration, SocketEventRegistry};
pub use subscription::{EventBinding, EventHub};
