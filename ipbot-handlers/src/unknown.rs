use std::sync::Arc;

use async_trait::async_trait;

use ipbot_core::{CommandHandler, Result, TelegramApi};

const UNKNOWN: &str = "I don't know that command. Try /help for the list of commands.";

/// Fallback for `/`-prefixed messages with no registered handler.
pub struct UnknownHandler {
    api: Arc<dyn TelegramApi>,
}

impl UnknownHandler {
    pub fn new(api: Arc<dyn TelegramApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CommandHandler for UnknownHandler {
    async fn handle(&self, chat_id: i64) -> Result<()> {
        self.api.send_message(chat_id, UNKNOWN).await?;
        Ok(())
    }

    fn command(&self) -> &str {
        ""
    }
}
