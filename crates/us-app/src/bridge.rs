//! Embedded content bridge
//!
//! Owns one sandboxed frame's lifecycle on the host page: authenticates and
//! decodes inbound messages, maintains the frame's derived UI state, scrolls
//! the host document on the frame's behalf, and relays semantic block events
//! to the page that embedded it. Several bridges can share one message
//! stream; targeted resize messages carry a usage id so each bridge picks
//! out its own events without cross-talk.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use serde_json::{Map, Value};
use tracing::{debug, error};

use us_core::config::SyncConfig;
use us_core::frame::{FrameEnvelope, FrameMessage, FrameState};
use us_core::ids::{FrameId, FrameWindowId};
use us_core::ports::{FrameMessengerPort, HostWindowPort};

use crate::subscription::EventHandler;

/// A semantic event raised by the embedded content, e.g. "user clicked
/// cancel". This is the sole channel by which the frame can notify the host
/// without being granted any other capability.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNotification {
    pub event_type: String,
    pub args: Map<String, Value>,
}

pub type BlockNotificationHandler = Arc<dyn Fn(BlockNotification) + Send + Sync>;

pub struct EmbeddedFrameBridge {
    id: FrameId,
    frame_url: Mutex<String>,
    frame_window: Mutex<Option<FrameWindowId>>,
    state: Mutex<FrameState>,
    height_padding: f64,
    host: Arc<dyn HostWindowPort>,
    messenger: Arc<dyn FrameMessengerPort>,
    on_block_notification: Option<BlockNotificationHandler>,
}

impl EmbeddedFrameBridge {
    pub fn new(
        id: FrameId,
        frame_url: impl Into<String>,
        settings: &SyncConfig,
        host: Arc<dyn HostWindowPort>,
        messenger: Arc<dyn FrameMessengerPort>,
        on_block_notification: Option<BlockNotificationHandler>,
    ) -> Self {
        Self {
            id,
            frame_url: Mutex::new(frame_url.into()),
            frame_window: Mutex::new(None),
            state: Mutex::new(FrameState::default()),
            height_padding: settings.frame_height_padding,
            host,
            messenger,
            on_block_notification,
        }
    }

    pub fn id(&self) -> &FrameId {
        &self.id
    }

    pub fn frame_url(&self) -> String {
        self.frame_url.lock().expect("frame url lock poisoned").clone()
    }

    /// Snapshot of the frame's derived UI state.
    pub fn state(&self) -> FrameState {
        *self.state.lock().expect("frame state lock poisoned")
    }

    /// Record the content window identity of the frame this bridge created.
    /// Until a window is attached every inbound envelope is discarded.
    pub fn attach_frame_window(&self, window: FrameWindowId) {
        *self
            .frame_window
            .lock()
            .expect("frame window lock poisoned") = Some(window);
    }

    /// Process one inbound message event.
    ///
    /// Every envelope is discarded unless its source matches the tracked
    /// content window. This is the only authentication boundary; it is
    /// adequate because the frame URL is same-origin-controlled by the host.
    pub fn handle_message(&self, envelope: &FrameEnvelope) {
        if !self.is_tracked_source(&envelope.source) {
            return;
        }

        let message = match FrameMessage::parse(&envelope.data) {
            Ok(message) => message,
            Err(reason) => {
                debug!(frame = %self.id, %reason, "discarding frame message");
                return;
            }
        };

        match message {
            FrameMessage::Resize { height, usage_id } => self.on_resize(height, usage_id),
            FrameMessage::VideoFullScreen { open } => self.on_video_fullscreen(open),
            FrameMessage::BlockEvent { event_type, args } => {
                self.on_block_event(event_type, args)
            }
            FrameMessage::ScrollToBlock { offset } => {
                // Relative by contract: the frame reports how far the block
                // sits from the current viewport, not a document position.
                self.host.smooth_scroll_by(offset);
            }
            FrameMessage::Scroll { offset } => {
                self.host.scroll_to(offset + self.host.frame_anchor_top());
            }
        }
    }

    /// Wired to the frame's native load event.
    ///
    /// The native event fires even on HTTP error responses, so a load
    /// without any prior resize means the server returned an error page.
    /// Failure is terminal for this instance until a new URL is supplied.
    pub fn handle_frame_load(&self) {
        let failed = self
            .state
            .lock()
            .expect("frame state lock poisoned")
            .mark_load_complete();
        if failed {
            error!(
                frame_url = %self.frame_url(),
                "embedded frame failed to load; server possibly returned a 4xx or 5xx response"
            );
        }
    }

    /// Point the bridge at a new frame URL, resetting derived state.
    pub fn set_frame_url(&self, frame_url: impl Into<String>) {
        let frame_url = frame_url.into();
        let mut current = self.frame_url.lock().expect("frame url lock poisoned");
        if *current == frame_url {
            return;
        }
        *current = frame_url;
        self.state
            .lock()
            .expect("frame state lock poisoned")
            .reset_for_new_url();
    }

    /// Post a message into the embedded frame.
    pub fn send_to_frame(&self, data: Value) -> Result<()> {
        self.messenger.post(data)
    }

    /// Handler suitable for binding to a `message` event stream via
    /// [`crate::subscription::EventBinding`].
    pub fn message_handler(self: &Arc<Self>) -> EventHandler<FrameEnvelope> {
        let bridge = Arc::clone(self);
        Arc::new(move |envelope| bridge.handle_message(envelope))
    }

    fn is_tracked_source(&self, source: &FrameWindowId) -> bool {
        let tracked = self
            .frame_window
            .lock()
            .expect("frame window lock poisoned");
        tracked.as_ref() == Some(source)
    }

    fn on_resize(&self, height: f64, usage_id: Option<FrameId>) {
        // Targeted resize events belong to exactly one bridge.
        if usage_id.is_some_and(|usage_id| usage_id != self.id) {
            return;
        }
        self.state
            .lock()
            .expect("frame state lock poisoned")
            .apply_resize(height, self.height_padding);
    }

    fn on_video_fullscreen(&self, open: bool) {
        if open {
            let scroll_y = self.host.scroll_y();
            self.state
                .lock()
                .expect("frame state lock poisoned")
                .enter_fullscreen(scroll_y);
            return;
        }
        let anchor = self
            .state
            .lock()
            .expect("frame state lock poisoned")
            .exit_fullscreen();
        if let Some(top) = anchor {
            // Fullscreen playback made the host lose its scroll anchor; the
            // frame cannot scroll its parent, so the restore happens here.
            self.host.scroll_to(top);
        }
    }

    fn on_block_event(&self, event_type: String, args: Map<String, Value>) {
        if let Some(notify) = &self.on_block_notification {
            notify(BlockNotification { event_type, args });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;

    #[derive(Debug, Clone, PartialEq)]
    enum ScrollCall {
        To(f64),
        SmoothBy(f64),
    }

    struct FakeHostWindow {
        scroll_y: StdMutex<f64>,
        anchor_top: f64,
        calls: StdMutex<Vec<ScrollCall>>,
    }

    impl FakeHostWindow {
        fn new(scroll_y: f64, anchor_top: f64) -> Arc<Self> {
            Arc::new(Self {
                scroll_y: StdMutex::new(scroll_y),
                anchor_top,
                calls: StdMutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<ScrollCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl HostWindowPort for FakeHostWindow {
        fn scroll_y(&self) -> f64 {
            *self.scroll_y.lock().unwrap()
        }

        fn scroll_to(&self, top: f64) {
            *self.scroll_y.lock().unwrap() = top;
            self.calls.lock().unwrap().push(ScrollCall::To(top));
        }

        fn smooth_scroll_by(&self, delta: f64) {
            *self.scroll_y.lock().unwrap() += delta;
            self.calls.lock().unwrap().push(ScrollCall::SmoothBy(delta));
        }

        fn frame_anchor_top(&self) -> f64 {
            self.anchor_top
        }
    }

    struct FakeMessenger {
        posted: StdMutex<Vec<Value>>,
    }

    impl FakeMessenger {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                posted: StdMutex::new(Vec::new()),
            })
        }
    }

    impl FrameMessengerPort for FakeMessenger {
        fn post(&self, data: Value) -> Result<()> {
            self.posted.lock().unwrap().push(data);
            Ok(())
        }
    }

    struct Harness {
        bridge: Arc<EmbeddedFrameBridge>,
        host: Arc<FakeHostWindow>,
        messenger: Arc<FakeMessenger>,
        window: FrameWindowId,
        notifications: Arc<StdMutex<Vec<BlockNotification>>>,
    }

    fn harness() -> Harness {
        let host = FakeHostWindow::new(300.0, 50.0);
        let messenger = FakeMessenger::new();
        let notifications = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&notifications);
        let bridge = Arc::new(EmbeddedFrameBridge::new(
            FrameId::from("u1"),
            "http://studio.local/xblock/u1",
            &SyncConfig::default(),
            host.clone(),
            messenger.clone(),
            Some(Arc::new(move |notification| {
                sink.lock().unwrap().push(notification);
            })),
        ));
        let window = FrameWindowId::new();
        bridge.attach_frame_window(window.clone());
        Harness {
            bridge,
            host,
            messenger,
            window,
            notifications,
        }
    }

    fn envelope(window: &FrameWindowId, data: Value) -> FrameEnvelope {
        FrameEnvelope::new(window.clone(), data)
    }

    #[test]
    fn resize_sets_padded_height_and_loaded_flag() {
        let h = harness();
        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "resize", "payload": { "height": 500 } }),
        ));

        let state = h.bridge.state();
        assert_eq!(state.frame_height, 510.0);
        assert!(state.has_loaded);
    }

    #[test]
    fn targeted_resize_for_another_bridge_is_ignored() {
        let h = harness();
        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "resize", "payload": { "height": 500, "usageId": "u2" } }),
        ));
        assert_eq!(h.bridge.state(), FrameState::default());

        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "resize", "payload": { "height": 500, "usageId": "u1" } }),
        ));
        assert_eq!(h.bridge.state().frame_height, 510.0);
    }

    #[test]
    fn foreign_source_changes_no_state() {
        let h = harness();
        let stranger = FrameWindowId::new();
        h.bridge.handle_message(&envelope(
            &stranger,
            json!({ "type": "resize", "payload": { "height": 500 } }),
        ));
        assert_eq!(h.bridge.state(), FrameState::default());
        assert!(h.host.calls().is_empty());
    }

    #[test]
    fn fullscreen_round_trip_restores_scroll_anchor() {
        let h = harness();
        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "videoFullScreen", "payload": { "open": true } }),
        ));
        assert_eq!(h.bridge.state().window_top_offset, Some(300.0));

        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "videoFullScreen", "payload": { "open": false } }),
        ));
        assert_eq!(h.host.calls(), vec![ScrollCall::To(300.0)]);
        assert_eq!(h.bridge.state().window_top_offset, None);
    }

    #[test]
    fn fullscreen_exit_without_prior_entry_does_not_scroll() {
        let h = harness();
        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "videoFullScreen", "payload": { "open": false } }),
        ));
        assert!(h.host.calls().is_empty());
    }

    #[test]
    fn block_event_forwards_stripped_method_and_args() {
        let h = harness();
        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "xblock-event", "method": "xblock:cancel", "foo": "bar" }),
        ));

        let notifications = h.notifications.lock().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].event_type, "cancel");
        assert_eq!(notifications[0].args.get("foo"), Some(&json!("bar")));
        assert_eq!(
            notifications[0].args.get("type"),
            Some(&json!("xblock-event"))
        );
    }

    #[test]
    fn offset_message_scrolls_relative_to_the_anchor() {
        let h = harness();
        h.bridge
            .handle_message(&envelope(&h.window, json!({ "offset": 100 })));
        assert_eq!(h.host.calls(), vec![ScrollCall::To(150.0)]);
    }

    #[test]
    fn scroll_to_block_smooth_scrolls_by_the_reported_offset() {
        let h = harness();
        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "scrollToXBlock", "offset": 100 }),
        ));
        // Relative to the current position, unlike the bare offset message.
        assert_eq!(h.host.calls(), vec![ScrollCall::SmoothBy(100.0)]);
        assert_eq!(h.host.scroll_y(), 400.0);
    }

    #[test]
    fn unknown_messages_are_no_ops() {
        let h = harness();
        h.bridge
            .handle_message(&envelope(&h.window, json!({ "type": "telemetry" })));
        h.bridge.handle_message(&envelope(&h.window, json!(42)));
        assert_eq!(h.bridge.state(), FrameState::default());
        assert!(h.host.calls().is_empty());
        assert!(h.notifications.lock().unwrap().is_empty());
    }

    #[test]
    fn load_without_resize_flags_an_error() {
        let h = harness();
        h.bridge.handle_frame_load();
        assert!(h.bridge.state().show_error);
    }

    #[test]
    fn load_after_resize_is_fine() {
        let h = harness();
        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "resize", "payload": { "height": 500 } }),
        ));
        h.bridge.handle_frame_load();
        assert!(!h.bridge.state().show_error);
    }

    #[test]
    fn url_change_is_a_new_instance() {
        let h = harness();
        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "resize", "payload": { "height": 500 } }),
        ));
        h.bridge.set_frame_url("http://studio.local/xblock/u1?view=new");

        let state = h.bridge.state();
        assert_eq!(state.frame_height, 0.0);
        assert!(!state.has_loaded);

        // Setting the same URL again must not reset anything.
        h.bridge.handle_message(&envelope(
            &h.window,
            json!({ "type": "resize", "payload": { "height": 200 } }),
        ));
        h.bridge.set_frame_url("http://studio.local/xblock/u1?view=new");
        assert!(h.bridge.state().has_loaded);
    }

    #[test]
    fn loaded_flag_latches_across_later_resizes() {
        let h = harness();
        for height in [500, 0, 250] {
            h.bridge.handle_message(&envelope(
                &h.window,
                json!({ "type": "resize", "payload": { "height": height } }),
            ));
            if height > 0 {
                assert!(h.bridge.state().has_loaded);
            }
        }
        assert!(h.bridge.state().has_loaded);
    }

    #[test]
    fn send_to_frame_relays_through_the_messenger() {
        let h = harness();
        h.bridge
            .send_to_frame(json!({ "type": "refreshXBlock" }))
            .unwrap();
        assert_eq!(
            h.messenger.posted.lock().unwrap().as_slice(),
            &[json!({ "type": "refreshXBlock" })]
        );
    }

    #[test]
    fn message_handler_binds_into_an_event_hub() {
        use crate::subscription::{EventBinding, EventHub};

        let h = harness();
        let hub = Arc::new(EventHub::new());
        let _binding = EventBinding::bind(Arc::clone(&hub), "message", h.bridge.message_handler());

        hub.dispatch(
            "message",
            &envelope(&h.window, json!({ "type": "resize", "payload": { "height": 500 } })),
        );
        assert!(h.bridge.state().has_loaded);
    }
}
