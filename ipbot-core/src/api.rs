//! Capability traits: the transport seam, command handlers, and the
//! middleware contract used by the dispatch pipeline.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{Message, Update, User};

/// The remote API surface the rest of the system consumes. Implemented by
/// the resilient client; tests substitute scripted fakes.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    /// Long-polls for updates starting at `offset`. A poll window that
    /// elapses with nothing to deliver returns an empty batch, not an error.
    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>>;

    /// Sends plain text to a chat and returns the message the server echoed.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message>;

    /// Removes a registered webhook so long polling can proceed.
    async fn delete_webhook(&self) -> Result<bool>;

    /// Identity of the authenticated bot.
    async fn get_me(&self) -> Result<User>;
}

/// One command's handler. Registration is static: the router asks for
/// [`command`](CommandHandler::command) once at startup and never again.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, chat_id: i64) -> Result<()>;

    /// The exact token this handler claims, including the leading slash.
    fn command(&self) -> &str;
}

/// Terminal stage of the dispatch pipeline.
#[async_trait]
pub trait UpdateProcessor: Send + Sync {
    async fn process_update(&self, update: &Update) -> Result<()>;
}

/// Cross-cutting stage wrapped around update processing.
///
/// `next` is consumed by `run`, so a middleware can invoke the rest of the
/// pipeline at most once; not calling it short-circuits the dispatch.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn process(&self, update: &Update, next: Next<'_>) -> Result<()>;
}

/// The remainder of the pipeline: the middleware not yet run, ending in the
/// terminal processor.
pub struct Next<'a> {
    middleware: &'a [Arc<dyn Middleware>],
    terminal: &'a dyn UpdateProcessor,
}

impl<'a> Next<'a> {
    pub fn new(middleware: &'a [Arc<dyn Middleware>], terminal: &'a dyn UpdateProcessor) -> Self {
        Self {
            middleware,
            terminal,
        }
    }

    /// Runs the next middleware, or the terminal processor when none remain.
    pub async fn run(self, update: &Update) -> Result<()> {
        match self.middleware.split_first() {
            Some((head, rest)) => {
                head.process(
                    update,
                    Next {
                        middleware: rest,
                        terminal: self.terminal,
                    },
                )
                .await
            }
            None => self.terminal.process_update(update).await,
        }
    }
}
