//! Unit tests for ErrorHandlingMiddleware.

use ipbot_core::{BotError, Middleware, Next, Update};

use super::{sample_update, RecordingApi, ScriptedTerminal};
use crate::ErrorHandlingMiddleware;

#[tokio::test]
async fn success_sends_no_notice() {
    let api = RecordingApi::new();
    let terminal = ScriptedTerminal::succeeding();
    let mw = ErrorHandlingMiddleware::new(api.clone());

    let result = mw
        .process(&sample_update(42, "/home_ip"), Next::new(&[], &terminal))
        .await;

    assert!(result.is_ok());
    assert!(api.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failure_notifies_the_chat_and_returns_the_original_error() {
    let api = RecordingApi::new();
    let terminal = ScriptedTerminal::failing("lookup failed");
    let mw = ErrorHandlingMiddleware::new(api.clone());

    let err = mw
        .process(&sample_update(42, "/home_ip"), Next::new(&[], &terminal))
        .await
        .unwrap_err();

    assert!(matches!(err, BotError::Handler(msg) if msg == "lookup failed"));
    let sent = api.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 42);
    assert!(sent[0].1.contains("went wrong"));
}

#[tokio::test]
async fn failed_notice_is_swallowed() {
    let api = RecordingApi::failing();
    let terminal = ScriptedTerminal::failing("lookup failed");
    let mw = ErrorHandlingMiddleware::new(api);

    // The original error survives even though the notice could not be sent.
    let err = mw
        .process(&sample_update(42, "/home_ip"), Next::new(&[], &terminal))
        .await
        .unwrap_err();

    assert!(matches!(err, BotError::Handler(msg) if msg == "lookup failed"));
}

#[tokio::test]
async fn failure_without_chat_skips_the_notice() {
    let api = RecordingApi::new();
    let terminal = ScriptedTerminal::failing("lookup failed");
    let mw = ErrorHandlingMiddleware::new(api.clone());

    let update = Update {
        update_id: 3,
        message: None,
    };
    let result = mw.process(&update, Next::new(&[], &terminal)).await;

    assert!(result.is_err());
    assert!(api.sent.lock().unwrap().is_empty());
}
