//! Terminal pipeline stage that routes commands to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use ipbot_core::{CommandHandler, Result, Update, UpdateProcessor};

/// Routes the first whitespace-delimited token of a message to a handler.
///
/// Matching is exact and case-sensitive. A `/`-prefixed token with no
/// registered handler goes to the fallback; plain text is dropped without
/// invoking anything.
pub struct CommandRouter {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    fallback: Arc<dyn CommandHandler>,
}

impl CommandRouter {
    pub fn new(fallback: Arc<dyn CommandHandler>) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback,
        }
    }

    /// Registers a handler under the command it reports. A later
    /// registration for the same command replaces the earlier one.
    pub fn register(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.insert(handler.command().to_string(), handler);
        self
    }
}

#[async_trait]
impl UpdateProcessor for CommandRouter {
    async fn process_update(&self, update: &Update) -> Result<()> {
        let message = match &update.message {
            Some(message) => message,
            None => return Ok(()),
        };
        let text = match &message.text {
            Some(text) => text,
            None => return Ok(()),
        };
        let command = match text.split_whitespace().next() {
            Some(token) => token,
            None => return Ok(()),
        };
        if !command.starts_with('/') {
            debug!(update_id = update.update_id, "non-command message ignored");
            return Ok(());
        }

        match self.handlers.get(command) {
            Some(handler) => handler.handle(message.chat.id).await,
            None => self.fallback.handle(message.chat.id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipbot_core::{Chat, Message};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn text_update(text: &str) -> Update {
        Update {
            update_id: 1,
            message: Some(Message {
                message_id: 1,
                from: None,
                chat: Chat {
                    id: 42,
                    kind: "private".to_string(),
                },
                text: Some(text.to_string()),
                date: 0,
            }),
        }
    }

    struct RecordingHandler {
        command: &'static str,
        calls: AtomicUsize,
    }

    impl RecordingHandler {
        fn new(command: &'static str) -> Arc<Self> {
            Arc::new(Self {
                command,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CommandHandler for RecordingHandler {
        async fn handle(&self, chat_id: i64) -> Result<()> {
            assert_eq!(chat_id, 42);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn command(&self) -> &str {
            self.command
        }
    }

    fn router_with(
        start: Arc<RecordingHandler>,
        fallback: Arc<RecordingHandler>,
    ) -> CommandRouter {
        CommandRouter::new(fallback).register(start)
    }

    #[tokio::test]
    async fn first_token_selects_the_handler_and_arguments_are_ignored() {
        let start = RecordingHandler::new("/start");
        let fallback = RecordingHandler::new("");
        let router = router_with(start.clone(), fallback.clone());

        router
            .process_update(&text_update("/start extra args"))
            .await
            .unwrap();

        assert_eq!(start.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn unregistered_command_goes_to_the_fallback() {
        let start = RecordingHandler::new("/start");
        let fallback = RecordingHandler::new("");
        let router = router_with(start.clone(), fallback.clone());

        router
            .process_update(&text_update("/unregistered"))
            .await
            .unwrap();

        assert_eq!(start.calls(), 0);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn plain_text_invokes_nothing() {
        let start = RecordingHandler::new("/start");
        let fallback = RecordingHandler::new("");
        let router = router_with(start.clone(), fallback.clone());

        router.process_update(&text_update("hello")).await.unwrap();
        router.process_update(&text_update("   ")).await.unwrap();

        assert_eq!(start.calls(), 0);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn matching_is_case_sensitive() {
        let start = RecordingHandler::new("/start");
        let fallback = RecordingHandler::new("");
        let router = router_with(start.clone(), fallback.clone());

        router.process_update(&text_update("/Start")).await.unwrap();

        assert_eq!(start.calls(), 0);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn updates_without_message_or_text_are_dropped() {
        let start = RecordingHandler::new("/start");
        let fallback = RecordingHandler::new("");
        let router = router_with(start.clone(), fallback.clone());

        router
            .process_update(&Update {
                update_id: 2,
                message: None,
            })
            .await
            .unwrap();
        router
            .process_update(&Update {
                update_id: 3,
                message: Some(Message {
                    message_id: 2,
                    from: None,
                    chat: Chat {
                        id: 42,
                        kind: "private".to_string(),
                    },
                    text: None,
                    date: 0,
                }),
            })
            .await
            .unwrap();

        assert_eq!(start.calls(), 0);
        assert_eq!(fallback.calls(), 0);
    }
}
