//! Event subscription utility
//!
//! A reference-counted subscribe/unsubscribe wrapper over a process-wide
//! event target. Many components attach handlers for the same event type;
//! each [`EventBinding`] owns exactly one live handler and guarantees
//! remove-before-add ordering on rebinding, so a handler change can never
//! open a window of duplicate delivery, and teardown always removes the
//! last-attached handler rather than a stale one.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A handler attached to the hub for one event type.
pub type EventHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Process-wide event target, keyed by event-type name.
///
/// Stands in for the browser window as an event target: dispatching an
/// event type fans out to every attached handler, in attach order.
pub struct EventHub<T> {
    slots: Mutex<HashMap<String, BTreeMap<u64, EventHandler<T>>>>,
    next_token: AtomicU64,
}

impl<T> EventHub<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
        }
    }

    /// Deliver one event to every handler attached for `event_type`.
    ///
    /// Handlers are cloned out of the lock before being invoked, so a
    /// handler may itself bind or unbind without deadlocking.
    pub fn dispatch(&self, event_type: &str, payload: &T) {
        let handlers: Vec<EventHandler<T>> = {
            let slots = self.slots.lock().expect("event hub lock poisoned");
            slots
                .get(event_type)
                .map(|attached| attached.values().cloned().collect())
                .unwrap_or_default()
        };
        for handler in handlers {
            handler(payload);
        }
    }

    /// Number of handlers currently attached for `event_type`.
    pub fn handler_count(&self, event_type: &str) -> usize {
        let slots = self.slots.lock().expect("event hub lock poisoned");
        slots.get(event_type).map_or(0, BTreeMap::len)
    }

    fn attach(&self, event_type: &str, handler: EventHandler<T>) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let mut slots = self.slots.lock().expect("event hub lock poisoned");
        slots
            .entry(event_type.to_string())
            .or_default()
            .insert(token, handler);
        token
    }

    fn detach(&self, event_type: &str, token: u64) {
        let mut slots = self.slots.lock().expect("event hub lock poisoned");
        if let Some(attached) = slots.get_mut(event_type) {
            attached.remove(&token);
            if attached.is_empty() {
                slots.remove(event_type);
            }
        }
    }
}

impl<T> Default for EventHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One caller's subscription to an event type.
///
/// Holds no state beyond "the currently attached handler"; dropping the
/// binding detaches it exactly once.
pub struct EventBinding<T> {
    hub: Arc<EventHub<T>>,
    event_type: String,
    token: Option<u64>,
}

impl<T> EventBinding<T> {
    /// Attach `handler` for `event_type`.
    pub fn bind(
        hub: Arc<EventHub<T>>,
        event_type: impl Into<String>,
        handler: EventHandler<T>,
    ) -> Self {
        let mut binding = Self {
            hub,
            event_type: event_type.into(),
            token: None,
        };
        binding.rebind(handler);
        binding
    }

    /// Replace this binding's handler. The previous handler is removed
    /// before the new one is attached.
    pub fn rebind(&mut self, handler: EventHandler<T>) {
        self.unbind();
        self.token = Some(self.hub.attach(&self.event_type, handler));
    }

    /// Move this binding to a different event type, replacing the handler.
    /// The old attachment is removed first.
    pub fn rebind_to(&mut self, event_type: impl Into<String>, handler: EventHandler<T>) {
        self.unbind();
        self.event_type = event_type.into();
        self.token = Some(self.hub.attach(&self.event_type, handler));
    }

    /// Detach the currently attached handler, if any.
    pub fn unbind(&mut self) {
        if let Some(token) = self.token.take() {
            self.hub.detach(&self.event_type, token);
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }
}

impl<T> Drop for EventBinding<T> {
    fn drop(&mut self) {
        self.unbind();
    }
}
