//! Infrastructure adapters implementing the us-core ports.

pub mod bus;
pub mod http;

pub use bus::LocalBroadcastBus;
pub use http::HttpClipboardApi;
