use std::sync::Arc;

use async_trait::async_trait;

use ipbot_core::{CommandHandler, Result, TelegramApi};

const WELCOME: &str = "Welcome! I can report the IP addresses of the machine I run on.\n\n\
Commands:\n\
/home_ip - show the current local and public IP addresses\n\
/help - show this list again";

/// Greets the user and lists the available commands.
pub struct StartHandler {
    api: Arc<dyn TelegramApi>,
}

impl StartHandler {
    pub fn new(api: Arc<dyn TelegramApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CommandHandler for StartHandler {
    async fn handle(&self, chat_id: i64) -> Result<()> {
        self.api.send_message(chat_id, WELCOME).await?;
        Ok(())
    }

    fn command(&self) -> &str {
        "/start"
    }
}
