//! ID type wrappers for type safety.

mod id_macro;

pub mod frame_id;
pub mod usage_key;

pub use frame_id::{FrameId, FrameWindowId};
pub use usage_key::UsageKey;
