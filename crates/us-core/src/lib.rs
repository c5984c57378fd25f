//! # us-core
//!
//! Core domain models and business logic for UniStage.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod config;
pub mod frame;
pub mod ids;
pub mod ports;
pub mod staging;

// Re-export commonly used types at the crate root
pub use config::{ApiConfig, AppConfig, SyncConfig};
pub use frame::{FrameEnvelope, FrameMessage, FrameMessageError, FrameState};
pub use ids::{FrameId, FrameWindowId, UsageKey};
pub use staging::{ClipboardStatus, PasteEligibility, StagedContent, StagingNotice, StagingStatus};
