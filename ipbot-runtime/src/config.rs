//! Environment-driven configuration.

use std::env;
use std::time::Duration;

use ipbot_client::ClientConfig;
use ipbot_core::{BotError, Result};

use crate::poller::PollerConfig;

const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Everything the bot reads from the environment, resolved once at startup.
///
/// A missing `BOT_TOKEN` and any unparseable numeric value are fatal; absent
/// optional keys fall back to their defaults.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub api_url: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub rate_limit_floor: Duration,
    pub fetch_timeout: Duration,
    pub long_poll: Duration,
    pub update_limit: u32,
    pub dispatch_timeout: Duration,
    pub idle_interval: Duration,
    pub error_backoff: Duration,
    pub log_file: Option<String>,
}

impl BotConfig {
    /// Loads configuration, preferring `token_override` (from the CLI) over
    /// the `BOT_TOKEN` variable.
    pub fn load(token_override: Option<String>) -> Result<Self> {
        let token = match token_override {
            Some(token) => token,
            None => env::var("BOT_TOKEN")
                .map_err(|_| BotError::Config("BOT_TOKEN is not set".to_string()))?,
        };
        if token.trim().is_empty() {
            return Err(BotError::Config("BOT_TOKEN is empty".to_string()));
        }

        Ok(Self {
            token,
            api_url: env::var("TELEGRAM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            max_retries: parse_env("MAX_RETRIES", 3)?,
            retry_delay: secs_env("RETRY_DELAY_SECS", 2)?,
            rate_limit_floor: secs_env("RATE_LIMIT_FLOOR_SECS", 3)?,
            fetch_timeout: secs_env("FETCH_TIMEOUT_SECS", 40)?,
            long_poll: secs_env("LONG_POLL_SECS", 30)?,
            update_limit: parse_env("UPDATE_LIMIT", 100)?,
            dispatch_timeout: secs_env("DISPATCH_TIMEOUT_SECS", 30)?,
            idle_interval: secs_env("IDLE_INTERVAL_SECS", 1)?,
            error_backoff: secs_env("ERROR_BACKOFF_SECS", 5)?,
            log_file: env::var("LOG_FILE").ok().filter(|v| !v.trim().is_empty()),
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            max_retries: self.max_retries,
            retry_delay: self.retry_delay,
            rate_limit_floor: self.rate_limit_floor,
            fetch_timeout: self.fetch_timeout,
            long_poll: self.long_poll,
            update_limit: self.update_limit,
        }
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            dispatch_timeout: self.dispatch_timeout,
            idle_interval: self.idle_interval,
            error_backoff: self.error_backoff,
        }
    }
}

fn parse_env(key: &str, default: u32) -> Result<u32> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| BotError::Config(format!("{key} is not a valid number: {raw:?}"))),
        Err(_) => Ok(default),
    }
}

fn secs_env(key: &str, default: u64) -> Result<Duration> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| BotError::Config(format!("{key} is not a valid number: {raw:?}"))),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}
