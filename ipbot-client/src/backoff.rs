//! Per-attempt retry classification and delay computation.

use std::time::Duration;

use ipbot_core::BotError;

use crate::config::ClientConfig;

/// What to do after a failed attempt. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryDecision {
    pub retryable: bool,
    pub delay: Duration,
}

impl RetryDecision {
    fn give_up() -> Self {
        Self {
            retryable: false,
            delay: Duration::ZERO,
        }
    }

    fn retry_in(delay: Duration) -> Self {
        Self {
            retryable: true,
            delay,
        }
    }
}

/// Classifies a failed attempt. `attempt` is the 1-based number of the
/// attempt that just failed; the linear schedule waits `retry_delay *
/// attempt` before the next one. A rate-limited response overrides the
/// schedule with `max(server retry_after, rate_limit_floor)`.
pub fn decide(error: &BotError, attempt: u32, config: &ClientConfig) -> RetryDecision {
    match error {
        BotError::Transport { transient, .. } => {
            if *transient {
                RetryDecision::retry_in(linear(config, attempt))
            } else {
                RetryDecision::give_up()
            }
        }
        BotError::Api(api) => {
            if api.is_rate_limited() {
                let suggested = api.retry_after().unwrap_or(config.rate_limit_floor);
                RetryDecision::retry_in(suggested.max(config.rate_limit_floor))
            } else if api.is_retryable() {
                RetryDecision::retry_in(linear(config, attempt))
            } else {
                RetryDecision::give_up()
            }
        }
        _ => RetryDecision::give_up(),
    }
}

fn linear(config: &ClientConfig, attempt: u32) -> Duration {
    config.retry_delay * attempt.max(1)
}
