use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use ipbot_core::{Middleware, Next, Result, TelegramApi, Update};

const FAILURE_NOTICE: &str = "Something went wrong while handling your request. Please try again.";

/// Converts downstream failures into a user-visible notice.
///
/// The notice send is best effort: if it fails too, the secondary failure is
/// logged and dropped. The original error is returned either way so outer
/// layers still observe it.
pub struct ErrorHandlingMiddleware {
    api: Arc<dyn TelegramApi>,
}

impl ErrorHandlingMiddleware {
    pub fn new(api: Arc<dyn TelegramApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Middleware for ErrorHandlingMiddleware {
    async fn process(&self, update: &Update, next: Next<'_>) -> Result<()> {
        let result = next.run(update).await;
        if let Err(err) = &result {
            error!(
                update_id = update.update_id,
                error = %err,
                "handler failed, notifying user"
            );
            if let Some(chat_id) = update.chat_id() {
                if let Err(notice_err) = self.api.send_message(chat_id, FAILURE_NOTICE).await {
                    warn!(chat_id, error = %notice_err, "failure notice could not be sent");
                }
            }
        }
        result
    }
}
