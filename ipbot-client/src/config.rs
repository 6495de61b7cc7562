use std::time::Duration;

/// Retry and timeout settings for [`TelegramClient`](crate::TelegramClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base, without the `/bot<token>` suffix.
    pub api_url: String,
    /// Retries after the first attempt; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    /// Base of the linear backoff schedule (`retry_delay × attempt`).
    pub retry_delay: Duration,
    /// Minimum wait when the server signals rate limiting.
    pub rate_limit_floor: Duration,
    /// Whole-request timeout. Must exceed `long_poll` or every fetch would
    /// time out mid-window.
    pub fetch_timeout: Duration,
    /// Long-poll window passed to `getUpdates` as the `timeout` parameter.
    pub long_poll: Duration,
    /// `limit` parameter for `getUpdates`.
    pub update_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.telegram.org".to_string(),
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            rate_limit_floor: Duration::from_secs(3),
            fetch_timeout: Duration::from_secs(40),
            long_poll: Duration::from_secs(30),
            update_limit: 100,
        }
    }
}
