//! The Telegram API response envelope and error classification.
//!
//! Every remote call returns `{ ok, result?, error_code?, description?,
//! parameters? }`. The `ok` flag is the authoritative success signal;
//! [`ApiResponse::into_result`] collapses the envelope into either the typed
//! payload or an [`ApiError`] carrying the structured failure metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::BotError;

/// Structured parameters attached to failure envelopes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    /// Seconds the server asks us to wait before retrying.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub too_many_requests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_not_found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_not_found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_kicked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_bot_token: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_api_error: Option<bool>,
}

/// Generic response envelope for any API method.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub error_code: Option<i64>,
    pub description: Option<String>,
    pub parameters: Option<ResponseParameters>,
}

impl<T> ApiResponse<T> {
    /// Collapses the envelope: exactly one of "success with payload" or
    /// "failure with code" holds. An `ok` envelope without a result is a
    /// malformed body, not a success.
    pub fn into_result(self) -> Result<T, BotError> {
        if self.ok {
            self.result
                .ok_or_else(|| BotError::MalformedResponse("ok envelope without result".to_string()))
        } else {
            Err(BotError::Api(ApiError {
                code: self.error_code.unwrap_or(0),
                description: self
                    .description
                    .unwrap_or_else(|| "unknown api error".to_string()),
                parameters: self.parameters,
            }))
        }
    }
}

/// A failure envelope, normalized: numeric code, human description, and the
/// optional structured parameters.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: i64,
    pub description: String,
    pub parameters: Option<ResponseParameters>,
}

/// Error codes worth another attempt regardless of parameter flags.
const RETRYABLE_CODES: [i64; 5] = [429, 500, 502, 503, 504];

impl ApiError {
    fn flag(&self, get: impl Fn(&ResponseParameters) -> Option<bool>) -> bool {
        self.parameters.as_ref().and_then(get).unwrap_or(false)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.code == 429 || self.flag(|p| p.too_many_requests)
    }

    pub fn is_network_error(&self) -> bool {
        self.flag(|p| p.network_error)
    }

    pub fn is_internal_error(&self) -> bool {
        self.flag(|p| p.internal_api_error)
    }

    pub fn is_chat_not_found(&self) -> bool {
        self.flag(|p| p.chat_not_found)
    }

    /// Server-suggested wait before the next attempt, when present.
    pub fn retry_after(&self) -> Option<Duration> {
        self.parameters
            .as_ref()
            .and_then(|p| p.retry_after)
            .map(Duration::from_secs)
    }

    /// Whether another attempt can succeed: a retryable status code, or an
    /// explicit rate-limit/network/internal flag in the parameters.
    pub fn is_retryable(&self) -> bool {
        RETRYABLE_CODES.contains(&self.code)
            || self.is_rate_limited()
            || self.is_network_error()
            || self.is_internal_error()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description, self.code)
    }
}
