//! Composition root: build the client, handlers, and pipeline, then poll.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ipbot_client::TelegramClient;
use ipbot_core::TelegramApi;
use ipbot_dispatch::{CommandRouter, DispatchPipeline};
use ipbot_handlers::{HelpHandler, HomeIpHandler, HttpIpService, StartHandler, UnknownHandler};
use ipbot_middleware::{ErrorHandlingMiddleware, LoggingMiddleware};

use crate::config::BotConfig;
use crate::poller::Poller;

/// Runs the bot until the token is cancelled.
pub async fn run_bot(config: BotConfig, cancel: CancellationToken) -> anyhow::Result<()> {
    let client = TelegramClient::new(&config.token, config.client_config(), cancel.clone())?;
    let api: Arc<dyn TelegramApi> = Arc::new(client);

    match api.get_me().await {
        Ok(me) => info!(
            bot_id = me.id,
            username = me.username.as_deref().unwrap_or("unknown"),
            "authenticated"
        ),
        Err(err) => warn!(error = %err, "identity check failed, continuing"),
    }

    let ip_service = Arc::new(HttpIpService::new()?);
    let router = CommandRouter::new(Arc::new(UnknownHandler::new(api.clone())))
        .register(Arc::new(StartHandler::new(api.clone())))
        .register(Arc::new(HelpHandler::new(api.clone())))
        .register(Arc::new(HomeIpHandler::new(api.clone(), ip_service)));

    // Logging first so it wraps error recovery and sees the final outcome.
    let pipeline = Arc::new(
        DispatchPipeline::new(Arc::new(router))
            .with_middleware(Arc::new(LoggingMiddleware))
            .with_middleware(Arc::new(ErrorHandlingMiddleware::new(api.clone()))),
    );

    Poller::new(api, pipeline, config.poller_config(), cancel)
        .run()
        .await;
    Ok(())
}
