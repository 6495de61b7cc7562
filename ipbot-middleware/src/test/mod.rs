//! Unit test module
//!
//! Middleware unit tests live here, separate from source files.

mod error_handling_middleware_test;
mod logging_middleware_test;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ipbot_core::{
    BotError, Chat, Message, Result, TelegramApi, Update, UpdateProcessor, User,
};

pub(crate) fn sample_update(chat_id: i64, text: &str) -> Update {
    Update {
        update_id: 7,
        message: Some(Message {
            message_id: 1,
            from: None,
            chat: Chat {
                id: chat_id,
                kind: "private".to_string(),
            },
            text: Some(text.to_string()),
            date: 0,
        }),
    }
}

/// Terminal stage scripted to succeed or fail.
pub(crate) struct ScriptedTerminal {
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedTerminal {
    pub(crate) fn succeeding() -> Self {
        Self {
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpdateProcessor for ScriptedTerminal {
    async fn process_update(&self, _update: &Update) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(BotError::Handler(message.clone())),
            None => Ok(()),
        }
    }
}

/// Records outbound messages; optionally fails every send.
pub(crate) struct RecordingApi {
    pub(crate) sent: Mutex<Vec<(i64, String)>>,
    fail_sends: bool,
}

impl RecordingApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: false,
        })
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: true,
        })
    }
}

#[async_trait]
impl TelegramApi for RecordingApi {
    async fn get_updates(&self, _offset: i64) -> Result<Vec<Update>> {
        Ok(Vec::new())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        if self.fail_sends {
            return Err(BotError::Handler("send failed".to_string()));
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(Message {
            message_id: 1,
            from: None,
            chat: Chat {
                id: chat_id,
                kind: "private".to_string(),
            },
            text: Some(text.to_string()),
            date: 0,
        })
    }

    async fn delete_webhook(&self) -> Result<bool> {
        Ok(true)
    }

    async fn get_me(&self) -> Result<User> {
        Ok(User {
            id: 1,
            username: Some("testbot".to_string()),
            first_name: Some("Test".to_string()),
        })
    }
}
