//! # ipbot-middleware
//!
//! Cross-cutting middleware for the dispatch pipeline: request/outcome
//! logging and user-visible error recovery.

mod error_handling;
mod logging;

pub use error_handling::ErrorHandlingMiddleware;
pub use logging::LoggingMiddleware;

#[cfg(test)]
mod test;
