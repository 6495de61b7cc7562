//! # ipbot-core
//!
//! Core types and traits for the bot: Telegram wire types, the API response
//! envelope with its retryability classification, the [`BotError`] taxonomy,
//! capability traits ([`TelegramApi`], [`CommandHandler`], [`Middleware`]),
//! and tracing initialization. Transport-agnostic; used by every other crate.

pub mod api;
pub mod error;
pub mod logger;
pub mod response;
pub mod types;

pub use api::{CommandHandler, Middleware, Next, TelegramApi, UpdateProcessor};
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use response::{ApiError, ApiResponse, ResponseParameters};
pub use types::{Chat, Message, SendMessageRequest, Update, User};
