//! Host window port
//!
//! The host document surface the frame bridge scrolls. The embedded frame
//! cannot scroll its parent; this port is the only place that capability
//! exists, which is why scroll restoration after fullscreen video lives in
//! the bridge and nowhere else.

pub trait HostWindowPort: Send + Sync {
    /// Current vertical scroll position of the host document.
    fn scroll_y(&self) -> f64;

    /// Scroll the host document to an absolute vertical position.
    fn scroll_to(&self, top: f64);

    /// Smooth-scroll the host document by a relative vertical delta.
    fn smooth_scroll_by(&self, delta: f64);

    /// Document-absolute top of the well-known anchor the embedded frame's
    /// offsets are relative to.
    fn frame_anchor_top(&self) -> f64;
}
