//! Realtime transport port
//!
//! Abstracts the single realtime connection a page holds. The socket event
//! registry multiplexes arbitrarily many subscribers over one connection;
//! this port only exposes the connection itself and its event stream.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

/// Connection-level and server-pushed events from the transport.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    /// A named server-pushed event with its payload.
    Message { event: String, payload: Value },
}

#[async_trait]
pub trait RealtimeTransportPort: Send + Sync {
    /// Open the connection, authenticating with the supplied token.
    async fn connect(&self, auth_token: &str) -> Result<()>;

    /// Close the connection.
    async fn disconnect(&self) -> Result<()>;

    /// Emit a named event toward the server.
    async fn emit(&self, event: &str, payload: Value) -> Result<()>;

    /// Subscribe to transport events.
    ///
    /// Returns a receiver yielding connection lifecycle changes and named
    /// server-pushed messages.
    async fn subscribe_events(&self) -> Result<mpsc::Receiver<TransportEvent>>;
}
