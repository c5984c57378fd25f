//! Socket event registry
//!
//! A process-wide multiplexed subscription registry over a single realtime
//! connection. Arbitrarily many components register typed callbacks for
//! named server-pushed events without each opening its own connection, and
//! unregistering is a disposer guard so no listener leaks across remounts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, Weak};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use us_core::ports::{RealtimeTransportPort, TransportEvent};

pub type SocketEventCallback = Arc<dyn Fn(&Value) + Send + Sync>;

type CallbackSets = HashMap<String, HashMap<u64, SocketEventCallback>>;

pub struct SocketEventRegistry {
    transport: Arc<dyn RealtimeTransportPort>,
    callbacks: StdMutex<CallbackSets>,
    next_token: AtomicU64,
    connected: AtomicBool,
    running: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SocketEventRegistry {
    pub fn new(transport: Arc<dyn RealtimeTransportPort>) -> Self {
        Self {
            transport,
            callbacks: StdMutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
            connected: AtomicBool::new(false),
            running: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// Whether the underlying connection is currently up.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Register a callback for a named server-pushed event.
    ///
    /// Registration is independent of connection state; callbacks added
    /// before the connection opens start firing once it does. The returned
    /// guard unregisters exactly this callback when dropped.
    pub fn register_event_callback(
        self: &Arc<Self>,
        event_name: impl Into<String>,
        callback: SocketEventCallback,
    ) -> EventRegistration {
        let event_name = event_name.into();
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.callbacks
            .lock()
            .expect("socket registry lock poisoned")
            .entry(event_name.clone())
            .or_default()
            .insert(token, callback);

        EventRegistration {
            registry: Arc::downgrade(self),
            event_name,
            token,
        }
    }

    /// Open the connection and start fanning transport events out to the
    /// registered callbacks. Idempotent while running.
    pub async fn start(self: &Arc<Self>, auth_token: &str) -> Result<()> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }

        let mut events = match self.open_transport(auth_token).await {
            Ok(events) => events,
            Err(reason) => {
                // A failed start must stay retryable.
                self.running.store(false, Ordering::Release);
                return Err(reason);
            }
        };
        let registry = Arc::clone(self);

        let handle = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    TransportEvent::Connected => {
                        registry.connected.store(true, Ordering::Release);
                    }
                    TransportEvent::Disconnected => {
                        registry.connected.store(false, Ordering::Release);
                    }
                    TransportEvent::Message { event, payload } => {
                        registry.fan_out(&event, &payload);
                    }
                }
            }
            debug!("realtime transport event stream ended");
        });

        *self.task.lock().await = Some(handle);

        Ok(())
    }

    /// Tear down: stop the fan-out loop and close the connection.
    /// Registered callbacks survive a stop/start cycle.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
        }
        self.connected.store(false, Ordering::Release);
        if let Err(reason) = self.transport.disconnect().await {
            warn!(%reason, "failed to close the realtime connection");
        }
    }

    /// Emit a named event toward the server.
    pub async fn emit(&self, event: &str, payload: Value) -> Result<()> {
        self.transport
            .emit(event, payload)
            .await
            .with_context(|| format!("failed to emit realtime event `{event}`"))
    }

    /// Number of callbacks registered for an event name.
    pub fn callback_count(&self, event_name: &str) -> usize {
        self.callbacks
            .lock()
            .expect("socket registry lock poisoned")
            .get(event_name)
            .map_or(0, HashMap::len)
    }

    async fn open_transport(&self, auth_token: &str) -> Result<mpsc::Receiver<TransportEvent>> {
        self.transport
            .connect(auth_token)
            .await
            .context("failed to open the realtime connection")?;
        self.transport
            .subscribe_events()
            .await
            .context("failed to subscribe to realtime transport events")
    }

    fn fan_out(&self, event_name: &str, payload: &Value) {
        let callbacks: Vec<SocketEventCallback> = {
            let registered = self
                .callbacks
                .lock()
                .expect("socket registry lock poisoned");
            registered
                .get(event_name)
                .map(|set| set.values().cloned().collect())
                .unwrap_or_default()
        };
        for callback in callbacks {
            callback(payload);
        }
    }

    fn unregister(&self, event_name: &str, token: u64) {
        let mut registered = self
            .callbacks
            .lock()
            .expect("socket registry lock poisoned");
        if let Some(set) = registered.get_mut(event_name) {
            set.remove(&token);
            if set.is_empty() {
                registered.remove(event_name);
            }
        }
    }
}

/// Disposer guard returned by [`SocketEventRegistry::register_event_callback`].
pub struct EventRegistration {
    registry: Weak<SocketEventRegistry>,
    event_name: String,
    token: u64,
}

impl Drop for EventRegistration {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(&self.event_name, self.token);
        }
    }
}
