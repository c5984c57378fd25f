//! Application configuration domain model

use serde::{Deserialize, Serialize};

/// Application configuration
///
/// Only the knobs the synchronization core actually consults; everything
/// else about the authoring surface is configured elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend API settings
    pub api: ApiConfig,

    /// Synchronization settings
    pub sync: SyncConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the authoring backend, e.g. `http://studio.local`
    pub base_url: String,
}

/// Synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Clipboard status poll interval while staging is in progress.
    /// Fixed, no backoff: staging completes quickly and a lost tick only
    /// delays the UI, never correctness.
    pub poll_interval_ms: u64,

    /// Padding added to frame-reported heights before rendering.
    pub frame_height_padding: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:18010".to_string(),
            },
            sync: SyncConfig::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            frame_height_padding: 10.0,
        }
    }
}
