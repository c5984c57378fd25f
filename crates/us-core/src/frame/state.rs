use serde::{Deserialize, Serialize};

/// Derived UI state of one embedded frame.
///
/// Design principle: this is a pure state holder with transition helpers.
/// Message authentication and dispatch live in the application layer; the
/// state only knows how to apply the outcome of a dispatched message.
///
/// Invariant: `has_loaded` becomes true only after the first resize that
/// reports a strictly positive height, and stays true until the frame URL
/// changes (which is treated as a brand-new embedded instance).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameState {
    /// Rendered frame height, including host padding.
    pub frame_height: f64,

    /// The frame has produced at least one positive-height resize.
    pub has_loaded: bool,

    /// The frame's native load event fired without a resize ever arriving,
    /// which means the server most likely returned an error page.
    pub show_error: bool,

    /// Host scroll position recorded when video playback went fullscreen,
    /// restored when it exits.
    pub window_top_offset: Option<f64>,
}

impl FrameState {
    /// Apply a resize report from the frame.
    pub fn apply_resize(&mut self, height: f64, padding: f64) {
        self.frame_height = height + padding;
        if height > 0.0 {
            self.has_loaded = true;
        }
    }

    /// Record the host scroll anchor when fullscreen video opens.
    pub fn enter_fullscreen(&mut self, scroll_y: f64) {
        self.window_top_offset = Some(scroll_y);
    }

    /// Clear and return the recorded scroll anchor, if any.
    pub fn exit_fullscreen(&mut self) -> Option<f64> {
        self.window_top_offset.take()
    }

    /// Called when the frame's native load event fires. Returns true if
    /// this transition flagged a load failure.
    ///
    /// A same-origin frame fires `load` even on HTTP error responses, so
    /// "did we ever receive a resize" is the real loaded-signal; its absence
    /// here implies a 4xx/5xx response.
    pub fn mark_load_complete(&mut self) -> bool {
        if self.has_loaded {
            return false;
        }
        self.show_error = true;
        true
    }

    /// A frame URL change is a new embedded instance, not an update.
    pub fn reset_for_new_url(&mut self) {
        self.frame_height = 0.0;
        self.has_loaded = false;
    }
}
