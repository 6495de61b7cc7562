//! The long-poll loop: fetch, commit the offset, dispatch concurrently.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use ipbot_core::{BotError, TelegramApi, Update};
use ipbot_dispatch::DispatchPipeline;

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub dispatch_timeout: Duration,
    pub idle_interval: Duration,
    pub error_backoff: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout: Duration::from_secs(30),
            idle_interval: Duration::from_secs(1),
            error_backoff: Duration::from_secs(5),
        }
    }
}

/// Drives `getUpdates` and feeds each update to the pipeline.
///
/// The offset is advanced before the dispatch task is spawned, so delivery
/// is at-least-once per process lifetime but an update is never fetched
/// twice within one. Dispatch tasks run concurrently; there is no ordering
/// between updates, including updates from the same chat.
pub struct Poller {
    api: Arc<dyn TelegramApi>,
    pipeline: Arc<DispatchPipeline>,
    config: PollerConfig,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(
        api: Arc<dyn TelegramApi>,
        pipeline: Arc<DispatchPipeline>,
        config: PollerConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            pipeline,
            config,
            cancel,
        }
    }

    pub async fn run(&self) {
        // Long polling and webhooks are mutually exclusive server-side.
        match self.api.delete_webhook().await {
            Ok(_) => debug!("webhook cleared"),
            Err(err) => warn!(error = %err, "could not clear webhook, polling anyway"),
        }

        let mut offset = 0i64;
        info!("poller started");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let updates = tokio::select! {
                _ = self.cancel.cancelled() => break,
                result = self.api.get_updates(offset) => result,
            };

            let batch = match updates {
                Ok(batch) => batch,
                Err(BotError::Cancelled) => break,
                Err(err) => {
                    error!(offset, error = %err, "update fetch failed");
                    if !self.sleep(self.config.error_backoff).await {
                        break;
                    }
                    continue;
                }
            };

            if batch.is_empty() {
                if !self.sleep(self.config.idle_interval).await {
                    break;
                }
                continue;
            }

            debug!(count = batch.len(), offset, "batch received");
            for update in batch {
                // Commit before dispatching: a crash mid-dispatch loses the
                // update rather than replaying the whole batch forever.
                if update.update_id >= offset {
                    offset = update.update_id + 1;
                }
                self.spawn_dispatch(update);
            }
        }

        info!("poller stopped");
    }

    fn spawn_dispatch(&self, update: Update) {
        let pipeline = Arc::clone(&self.pipeline);
        let timeout = self.config.dispatch_timeout;
        tokio::spawn(async move {
            let update_id = update.update_id;
            match tokio::time::timeout(timeout, pipeline.process(&update)).await {
                Ok(Ok(())) => {}
                // The pipeline already logged the failure.
                Ok(Err(_)) => {}
                Err(_) => error!(update_id, "dispatch timed out"),
            }
        });
    }

    /// Returns false when the sleep was cut short by cancellation.
    async fn sleep(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }
}
