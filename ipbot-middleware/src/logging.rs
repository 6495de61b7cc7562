use std::time::Instant;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use ipbot_core::{Middleware, Next, Result, Update};

/// Logs each update on the way in and the outcome with elapsed time on the
/// way out. Errors pass through untouched.
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    #[instrument(skip(self, update, next), fields(update_id = update.update_id))]
    async fn process(&self, update: &Update, next: Next<'_>) -> Result<()> {
        match update.message.as_ref() {
            Some(message) => info!(
                chat_id = message.chat.id,
                text = %message.text.as_deref().unwrap_or(""),
                "update received"
            ),
            None => info!("update received without message"),
        }

        let started = Instant::now();
        let result = next.run(update).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(()) => info!(elapsed_ms, "update processed"),
            Err(err) => error!(elapsed_ms, error = %err, "update processing failed"),
        }
        result
    }
}
