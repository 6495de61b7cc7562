use std::sync::Arc;

use async_trait::async_trait;

use ipbot_core::{CommandHandler, Result, TelegramApi};

const HELP: &str = "Available commands:\n\
/start - introduction\n\
/home_ip - show the current local and public IP addresses\n\
/help - this list";

pub struct HelpHandler {
    api: Arc<dyn TelegramApi>,
}

impl HelpHandler {
    pub fn new(api: Arc<dyn TelegramApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, chat_id: i64) -> Result<()> {
        self.api.send_message(chat_id, HELP).await?;
        Ok(())
    }

    fn command(&self) -> &str {
        "/help"
    }
}
