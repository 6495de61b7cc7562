use thiserror::Error;

use crate::response::ApiError;

/// Error taxonomy for the whole subsystem.
///
/// Only `Config` (cannot start) and `Cancelled` (asked to stop) are fatal;
/// everything else stays local to the request or update that produced it.
#[derive(Error, Debug)]
pub enum BotError {
    /// The server answered with `ok: false`.
    #[error("telegram api error: {0}")]
    Api(ApiError),

    /// The request never produced a usable response. `transient` marks
    /// timeouts and connection resets, which are worth another attempt.
    #[error("transport error: {message}")]
    Transport { message: String, transient: bool },

    /// The body did not parse into the expected envelope shape.
    #[error("malformed api response: {0}")]
    MalformedResponse(String),

    /// The retry budget ran out; `last` is the final attempt's error.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<BotError> },

    #[error("operation cancelled")]
    Cancelled,

    #[error("handler error: {0}")]
    Handler(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
