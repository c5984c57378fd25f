//! Clipboard synchronization manager
//!
//! Owns the single "what's on the clipboard" resource for this tab: issues
//! staging requests, polls the backend while staging is in progress,
//! republishes every state change to sibling tabs over the broadcast bus,
//! and derives paste-eligibility flags from the staged content's type.
//!
//! Consistency model: last write wins. Broadcast receipts overwrite local
//! state unconditionally; the backend's staging endpoint is the sole arbiter
//! of truth and polling re-converges any straggling tab within one interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, warn};

use us_core::config::SyncConfig;
use us_core::ids::UsageKey;
use us_core::ports::{ClipboardApiPort, ClipboardBroadcastPort, NotificationPort};
use us_core::staging::{ClipboardStatus, PasteEligibility, StagingNotice};

pub struct ClipboardSyncManager {
    api: Arc<dyn ClipboardApiPort>,
    broadcast: Arc<dyn ClipboardBroadcastPort>,
    notifier: Arc<dyn NotificationPort>,
    can_edit: bool,
    poll_interval: Duration,
    status: RwLock<ClipboardStatus>,
    running: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ClipboardSyncManager {
    pub fn new(
        api: Arc<dyn ClipboardApiPort>,
        broadcast: Arc<dyn ClipboardBroadcastPort>,
        notifier: Arc<dyn NotificationPort>,
        can_edit: bool,
        settings: &SyncConfig,
    ) -> Self {
        Self {
            api,
            broadcast,
            notifier,
            can_edit,
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            status: RwLock::new(ClipboardStatus::default()),
            running: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// Start the background loop driving polling and broadcast receipt.
    /// Idempotent: a second start while running is a no-op.
    pub async fn start(self: &Arc<Self>) -> Result<()> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }

        let mut receiver = match self
            .broadcast
            .subscribe()
            .await
            .context("failed to subscribe to the clipboard broadcast channel")
        {
            Ok(receiver) => receiver,
            Err(reason) => {
                // A failed start must stay retryable.
                self.running.store(false, Ordering::Release);
                return Err(reason);
            }
        };
        let manager = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(manager.poll_interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !manager.snapshot().is_loading() {
                            continue;
                        }
                        if let Err(reason) = manager.poll_once().await {
                            // Resilient by construction: a lost tick only
                            // delays the UI update.
                            debug!(%reason, "clipboard poll failed; retrying next tick");
                        }
                    }
                    received = receiver.recv() => match received {
                        Ok(status) => manager.apply_broadcast(status),
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "clipboard broadcast receiver lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        });

        *self.task.lock().await = Some(handle);

        Ok(())
    }

    /// Tear down the background loop. No fetch is issued after this
    /// returns; an in-flight request is simply discarded.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
        }
    }

    /// Stage new content onto the clipboard.
    ///
    /// On success the returned status is stored locally and broadcast to
    /// every other tab. On failure the previous clipboard state is left
    /// untouched and exactly one failure notice is surfaced; the error is
    /// also returned for the caller. Blank keys are rejected before any
    /// request or notice is issued.
    pub async fn stage_content(&self, usage_key: &UsageKey) -> Result<()> {
        // The backend rejects blank references anyway; refusing here keeps
        // the notice stream quiet for a request that was never sendable.
        if !usage_key.is_valid() {
            bail!("refusing to stage a blank content reference");
        }

        self.notify(StagingNotice::Copying).await;

        match self.api.stage_content(usage_key).await {
            Ok(status) => {
                self.store(status.clone());
                self.publish(status).await;
                self.notify(StagingNotice::Copied).await;
                Ok(())
            }
            Err(reason) => {
                self.notify(StagingNotice::CopyFailed).await;
                Err(reason).with_context(|| format!("failed to stage {usage_key} to the clipboard"))
            }
        }
    }

    /// Current clipboard value as this tab knows it.
    pub fn snapshot(&self) -> ClipboardStatus {
        self.status
            .read()
            .expect("clipboard status lock poisoned")
            .clone()
    }

    /// Paste affordance flags for the current clipboard value.
    pub fn paste_flags(&self) -> PasteEligibility {
        PasteEligibility::derive(&self.snapshot(), self.can_edit)
    }

    /// Apply a clipboard value received from the broadcast channel.
    /// Broadcast messages are authoritative: last write wins, and applying
    /// the same value twice is a no-op by construction.
    pub fn apply_broadcast(&self, status: ClipboardStatus) {
        self.store(status);
    }

    /// One polling step: refetch status and, if it changed, store and
    /// republish it so sibling tabs converge too.
    async fn poll_once(&self) -> Result<()> {
        let status = self
            .api
            .fetch_status()
            .await
            .context("failed to fetch clipboard status")?;

        if self.snapshot() == status {
            return Ok(());
        }
        self.store(status.clone());
        self.publish(status).await;

        Ok(())
    }

    fn store(&self, status: ClipboardStatus) {
        *self
            .status
            .write()
            .expect("clipboard status lock poisoned") = status;
    }

    async fn publish(&self, status: ClipboardStatus) {
        if let Err(reason) = self.broadcast.publish(status).await {
            warn!(%reason, "failed to broadcast clipboard status to sibling tabs");
        }
    }

    async fn notify(&self, notice: StagingNotice) {
        if let Err(reason) = self.notifier.notify(notice).await {
            warn!(%reason, ?notice, "failed to surface staging notice");
        }
    }
}
