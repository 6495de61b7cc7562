//! Unit tests for LoggingMiddleware.

use ipbot_core::{BotError, Middleware, Next};

use super::{sample_update, ScriptedTerminal};
use crate::LoggingMiddleware;

#[tokio::test]
async fn logging_passes_success_through() {
    let terminal = ScriptedTerminal::succeeding();
    let update = sample_update(42, "/home_ip");

    let result = LoggingMiddleware
        .process(&update, Next::new(&[], &terminal))
        .await;

    assert!(result.is_ok());
    assert_eq!(terminal.calls(), 1);
}

#[tokio::test]
async fn logging_does_not_alter_errors() {
    let terminal = ScriptedTerminal::failing("downstream broke");
    let update = sample_update(42, "/home_ip");

    let err = LoggingMiddleware
        .process(&update, Next::new(&[], &terminal))
        .await
        .unwrap_err();

    assert!(matches!(err, BotError::Handler(msg) if msg == "downstream broke"));
}

#[tokio::test]
async fn logging_handles_updates_without_message() {
    let terminal = ScriptedTerminal::succeeding();
    let update = ipbot_core::Update {
        update_id: 9,
        message: None,
    };

    let result = LoggingMiddleware
        .process(&update, Next::new(&[], &terminal))
        .await;

    assert!(result.is_ok());
    assert_eq!(terminal.calls(), 1);
}
