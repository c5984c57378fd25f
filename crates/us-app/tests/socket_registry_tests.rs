//! Tests for [`SocketEventRegistry`]: multiplexed fan-out over one
//! connection, disposer-guard unregistration, and connection lifecycle.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use us_app::SocketEventRegistry;
use us_core::ports::{RealtimeTransportPort, TransportEvent};

/// Transport mock: hands the registry a receiver and keeps the sender so
/// the test can inject events.
struct FakeTransport {
    sender: Mutex<Option<mpsc::Sender<TransportEvent>>>,
    receiver: Mutex<Option<mpsc::Receiver<TransportEvent>>>,
    connected_with: Mutex<Option<String>>,
    connect_attempts: AtomicUsize,
    fail_next_connect: AtomicBool,
    disconnected: AtomicBool,
    emitted: Mutex<Vec<(String, Value)>>,
}

impl FakeTransport {
    fn new() -> Arc<Self> {
        let (sender, receiver) = mpsc::channel(32);
        Arc::new(Self {
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(Some(receiver)),
            connected_with: Mutex::new(None),
            connect_attempts: AtomicUsize::new(0),
            fail_next_connect: AtomicBool::new(false),
            disconnected: AtomicBool::new(false),
            emitted: Mutex::new(Vec::new()),
        })
    }

    async fn push(&self, event: TransportEvent) {
        let sender = self
            .sender
            .lock()
            .unwrap()
            .clone()
            .expect("transport sender gone");
        sender.send(event).await.expect("event loop not listening");
    }
}

#[async_trait]
impl RealtimeTransportPort for FakeTransport {
    async fn connect(&self, auth_token: &str) -> Result<()> {
        self.connect_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_connect.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("connection refused"));
        }
        *self.connected_with.lock().unwrap() = Some(auth_token.to_string());
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn emit(&self, event: &str, payload: Value) -> Result<()> {
        self.emitted
            .lock()
            .unwrap()
            .push((event.to_string(), payload));
        Ok(())
    }

    async fn subscribe_events(&self) -> Result<mpsc::Receiver<TransportEvent>> {
        Ok(self
            .receiver
            .lock()
            .unwrap()
            .take()
            .expect("events already subscribed"))
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within two seconds");
}

fn counting_callback(hits: &Arc<AtomicUsize>) -> Arc<dyn Fn(&Value) + Send + Sync> {
    let hits = Arc::clone(hits);
    Arc::new(move |_payload| {
        hits.fetch_add(1, Ordering::SeqCst);
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn fans_named_events_out_to_every_registered_callback() {
    let transport = FakeTransport::new();
    let registry = Arc::new(SocketEventRegistry::new(transport.clone()));
    registry.start("auth-token").await.unwrap();

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let other = Arc::new(AtomicUsize::new(0));
    let _a = registry.register_event_callback("grades.updated", counting_callback(&first));
    let _b = registry.register_event_callback("grades.updated", counting_callback(&second));
    let _c = registry.register_event_callback("enrollment.changed", counting_callback(&other));

    transport
        .push(TransportEvent::Message {
            event: "grades.updated".to_string(),
            payload: json!({ "course": "demo" }),
        })
        .await;

    wait_until(|| first.load(Ordering::SeqCst) == 1).await;
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(other.load(Ordering::SeqCst), 0);

    assert_eq!(
        transport.connected_with.lock().unwrap().as_deref(),
        Some("auth-token")
    );

    registry.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn dropping_the_registration_unregisters_the_callback() {
    let transport = FakeTransport::new();
    let registry = Arc::new(SocketEventRegistry::new(transport.clone()));
    registry.start("auth-token").await.unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let registration = registry.register_event_callback("grades.updated", counting_callback(&hits));
    assert_eq!(registry.callback_count("grades.updated"), 1);

    drop(registration);
    assert_eq!(registry.callback_count("grades.updated"), 0);

    transport
        .push(TransportEvent::Message {
            event: "grades.updated".to_string(),
            payload: json!({}),
        })
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    registry.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn connection_events_drive_the_connected_flag() {
    let transport = FakeTransport::new();
    let registry = Arc::new(SocketEventRegistry::new(transport.clone()));
    registry.start("auth-token").await.unwrap();
    assert!(!registry.is_connected());

    transport.push(TransportEvent::Connected).await;
    wait_until(|| registry.is_connected()).await;

    transport.push(TransportEvent::Disconnected).await;
    wait_until(|| !registry.is_connected()).await;

    registry.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_closes_the_connection_and_clears_the_flag() {
    let transport = FakeTransport::new();
    let registry = Arc::new(SocketEventRegistry::new(transport.clone()));
    registry.start("auth-token").await.unwrap();

    transport.push(TransportEvent::Connected).await;
    wait_until(|| registry.is_connected()).await;

    registry.stop().await;
    assert!(!registry.is_connected());
    assert!(transport.disconnected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn callbacks_registered_before_start_survive_and_fire_later() {
    let transport = FakeTransport::new();
    let registry = Arc::new(SocketEventRegistry::new(transport.clone()));

    let hits = Arc::new(AtomicUsize::new(0));
    let _registration =
        registry.register_event_callback("grades.updated", counting_callback(&hits));

    registry.start("auth-token").await.unwrap();
    transport
        .push(TransportEvent::Message {
            event: "grades.updated".to_string(),
            payload: json!({}),
        })
        .await;

    wait_until(|| hits.load(Ordering::SeqCst) == 1).await;
    registry.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn a_failed_start_can_be_retried() {
    let transport = FakeTransport::new();
    transport.fail_next_connect.store(true, Ordering::SeqCst);
    let registry = Arc::new(SocketEventRegistry::new(transport.clone()));

    assert!(registry.start("auth-token").await.is_err());

    // The failed attempt must not leave the registry wedged: the next
    // start reaches the transport again and comes up normally.
    registry.start("auth-token").await.unwrap();
    assert_eq!(transport.connect_attempts.load(Ordering::SeqCst), 2);

    let hits = Arc::new(AtomicUsize::new(0));
    let _registration =
        registry.register_event_callback("grades.updated", counting_callback(&hits));
    transport
        .push(TransportEvent::Message {
            event: "grades.updated".to_string(),
            payload: json!({}),
        })
        .await;
    wait_until(|| hits.load(Ordering::SeqCst) == 1).await;

    registry.stop().await;
}

#[tokio::test]
async fn emit_relays_through_the_transport() {
    let transport = FakeTransport::new();
    let registry = Arc::new(SocketEventRegistry::new(transport.clone()));

    registry
        .emit("presence.ping", json!({ "page": "outline" }))
        .await
        .unwrap();

    assert_eq!(
        transport.emitted.lock().unwrap().as_slice(),
        &[("presence.ping".to_string(), json!({ "page": "outline" }))]
    );
}
