//! The resilient API client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ipbot_core::{
    ApiError, ApiResponse, BotError, Message, Result, SendMessageRequest, TelegramApi, Update,
    User,
};

use crate::backoff;
use crate::config::ClientConfig;
use crate::metrics::ClientMetrics;

/// HTTP client for the Telegram bot API with bounded retry.
///
/// One logical operation ([`call`](Self::call)) makes up to
/// `max_retries + 1` attempts, waiting between them on the linear schedule or
/// the server's rate-limit guidance. Every wait and in-flight request races
/// the cancellation token, so shutdown is never stuck behind a backoff sleep.
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    config: ClientConfig,
    cancel: CancellationToken,
    metrics: Arc<ClientMetrics>,
}

impl TelegramClient {
    pub fn new(token: &str, config: ClientConfig, cancel: CancellationToken) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| BotError::Config(format!("failed to build http client: {e}")))?;
        let base_url = format!("{}/bot{}", config.api_url.trim_end_matches('/'), token);
        Ok(Self {
            http,
            base_url,
            config,
            cancel,
            metrics: Arc::new(ClientMetrics::default()),
        })
    }

    pub fn metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.metrics)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// One logical API call: POST the payload, parse the envelope, retry
    /// retryable failures until the budget runs out. Non-retryable failures
    /// and malformed bodies return immediately; cancellation aborts the
    /// backoff wait with [`BotError::Cancelled`].
    pub async fn call<T, P>(&self, method: &str, payload: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized + Sync,
    {
        let attempts = self.config.max_retries + 1;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let err = match self.attempt(method, payload).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            self.metrics.record_error();
            if matches!(err, BotError::Cancelled) {
                return Err(err);
            }

            let decision = backoff::decide(&err, attempt, &self.config);
            if !decision.retryable {
                return Err(err);
            }
            if attempt >= attempts {
                return Err(BotError::RetriesExhausted {
                    attempts,
                    last: Box::new(err),
                });
            }

            if let BotError::Api(api) = &err {
                if api.is_rate_limited() {
                    self.metrics.record_rate_limit();
                }
            }
            self.metrics.record_retry();
            warn!(
                method,
                attempt,
                delay_ms = decision.delay.as_millis() as u64,
                error = %err,
                "api call failed, retrying"
            );
            self.wait(decision.delay).await?;
        }
    }

    async fn attempt<T, P>(&self, method: &str, payload: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized + Sync,
    {
        self.metrics.record_request();
        let started = Instant::now();

        let send = self.http.post(self.method_url(method)).json(payload).send();
        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(BotError::Cancelled),
            result = send => result.map_err(transport_error)?,
        };
        self.metrics.record_latency(started.elapsed());

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        match serde_json::from_slice::<ApiResponse<T>>(&body) {
            // `ok` in the envelope is authoritative, not the HTTP status.
            Ok(envelope) => envelope.into_result(),
            Err(parse_err) if status.is_success() => {
                Err(BotError::MalformedResponse(parse_err.to_string()))
            }
            // Proxies answer 502/503 with HTML; classify by status so the
            // retry policy still applies.
            Err(_) => Err(BotError::Api(ApiError {
                code: i64::from(status.as_u16()),
                description: format!("http {status} with non-envelope body"),
                parameters: None,
            })),
        }
    }

    async fn wait(&self, delay: Duration) -> Result<()> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(BotError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    /// Single-attempt long-poll fetch.
    ///
    /// A transport timeout is the expected way an empty poll window ends, so
    /// it yields an empty batch without touching the error counters. Other
    /// failures surface to the poller, which retries at the same offset on
    /// its own fixed schedule.
    async fn fetch_updates(&self, offset: i64) -> Result<Vec<Update>> {
        self.metrics.record_request();
        let started = Instant::now();

        let send = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", self.config.long_poll.as_secs().to_string()),
                ("limit", self.config.update_limit.to_string()),
            ])
            .send();
        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(BotError::Cancelled),
            result = send => result,
        };

        let response = match response {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                debug!(offset, "long poll window elapsed with no updates");
                return Ok(Vec::new());
            }
            Err(err) => {
                self.metrics.record_error();
                return Err(transport_error(err));
            }
        };
        self.metrics.record_latency(started.elapsed());

        if response.status() == reqwest::StatusCode::CONFLICT {
            self.metrics.record_error();
            return Err(BotError::Api(ApiError {
                code: 409,
                description: "conflict: a webhook is registered or another poller is running"
                    .to_string(),
                parameters: None,
            }));
        }

        let envelope: ApiResponse<Vec<Update>> = match response.json().await {
            Ok(envelope) => envelope,
            Err(err) => {
                self.metrics.record_error();
                return Err(BotError::MalformedResponse(err.to_string()));
            }
        };
        match envelope.into_result() {
            Ok(updates) => Ok(updates),
            Err(err) => {
                self.metrics.record_error();
                Err(err)
            }
        }
    }

    /// `sendMessage` with an explicit parse mode (`MarkdownV2`, `HTML`).
    pub async fn send_message_with_parse_mode(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: &str,
    ) -> Result<Message> {
        let request = SendMessageRequest {
            chat_id,
            text: text.to_string(),
            parse_mode: Some(parse_mode.to_string()),
        };
        self.call("sendMessage", &request).await
    }
}

#[async_trait]
impl TelegramApi for TelegramClient {
    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        self.fetch_updates(offset).await
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        let request = SendMessageRequest {
            chat_id,
            text: text.to_string(),
            parse_mode: None,
        };
        self.call("sendMessage", &request).await
    }

    async fn delete_webhook(&self) -> Result<bool> {
        self.call("deleteWebhook", &serde_json::json!({})).await
    }

    async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }
}

fn transport_error(err: reqwest::Error) -> BotError {
    BotError::Transport {
        transient: err.is_timeout() || err.is_connect(),
        message: err.to_string(),
    }
}
