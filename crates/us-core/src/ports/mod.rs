//! Port interfaces for the application layer
//!
//! Ports define the contract between the synchronization managers and the
//! surfaces they touch (the staging REST API, the cross-tab broadcast bus,
//! the host document, the realtime transport). This follows Hexagonal
//! Architecture principles: the managers depend only on these abstractions,
//! never on concrete infrastructure.

pub mod broadcast;
pub mod clipboard_api;
pub mod frame_messenger;
pub mod host_window;
pub mod notification;
pub mod realtime;

pub use broadcast::ClipboardBroadcastPort;
pub use clipboard_api::ClipboardApiPort;
pub use frame_messenger::FrameMessengerPort;
pub use host_window::HostWindowPort;
pub use notification::NotificationPort;
pub use realtime::{RealtimeTransportPort, TransportEvent};
