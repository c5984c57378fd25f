//! HTTP adapter for the clipboard staging API.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::json;

use us_core::config::ApiConfig;
use us_core::ids::UsageKey;
use us_core::ports::ClipboardApiPort;
use us_core::staging::ClipboardStatus;

const CLIPBOARD_ENDPOINT: &str = "/api/content-staging/v1/clipboard/";

pub struct HttpClipboardApi {
    client: reqwest::Client,
    clipboard_url: String,
}

impl HttpClipboardApi {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            clipboard_url: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                CLIPBOARD_ENDPOINT
            ),
        }
    }
}

#[async_trait]
impl ClipboardApiPort for HttpClipboardApi {
    async fn fetch_status(&self) -> Result<ClipboardStatus> {
        let response = self
            .client
            .get(&self.clipboard_url)
            .send()
            .await
            .context("clipboard status request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "clipboard status request returned {}",
                response.status()
            ));
        }

        response
            .json::<ClipboardStatus>()
            .await
            .context("failed to decode clipboard status response")
    }

    async fn stage_content(&self, usage_key: &UsageKey) -> Result<ClipboardStatus> {
        let response = self
            .client
            .post(&self.clipboard_url)
            .json(&json!({ "usage_key": usage_key }))
            .send()
            .await
            .context("clipboard staging request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "clipboard staging request returned {}",
                response.status()
            ));
        }

        response
            .json::<ClipboardStatus>()
            .await
            .context("failed to decode clipboard staging response")
    }
}
