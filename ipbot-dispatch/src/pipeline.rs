//! Ordered middleware chain wrapping a terminal update processor.

use std::sync::Arc;

use tracing::debug;

use ipbot_core::{Middleware, Next, Result, Update, UpdateProcessor};

/// The middleware chain around update processing.
///
/// Middleware run in the order they were added: the first added is the
/// outermost. The set is fixed at construction; there is no runtime
/// mutation.
pub struct DispatchPipeline {
    middleware: Vec<Arc<dyn Middleware>>,
    terminal: Arc<dyn UpdateProcessor>,
}

impl DispatchPipeline {
    pub fn new(terminal: Arc<dyn UpdateProcessor>) -> Self {
        Self {
            middleware: Vec::new(),
            terminal,
        }
    }

    /// Appends a middleware; earlier additions wrap later ones.
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub async fn process(&self, update: &Update) -> Result<()> {
        debug!(update_id = update.update_id, "dispatch started");
        Next::new(&self.middleware, self.terminal.as_ref())
            .run(update)
            .await
    }
}
