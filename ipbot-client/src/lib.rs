//! # ipbot-client
//!
//! Resilient Telegram API client: bounded retry with linear backoff,
//! server-directed rate-limit waits, timeout-silent long-poll fetch, and
//! advisory request metrics. Implements [`ipbot_core::TelegramApi`].

mod backoff;
mod client;
mod config;
mod metrics;

pub use backoff::RetryDecision;
pub use client::TelegramClient;
pub use config::ClientConfig;
pub use metrics::{ClientMetrics, MetricsSnapshot};
