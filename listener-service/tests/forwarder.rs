//! LogForwarder behavior against a mocked log service.

use event_bus::{Error, EventHandler};
use httpmock::prelude::*;
use listener_service::handler::LogForwarder;
use relay_core::LogPayload;
use serde_json::json;

fn event() -> LogPayload {
    LogPayload {
        name: "event".to_string(),
        data: "something happened".to_string(),
    }
}

#[tokio::test]
async fn accepted_events_are_forwarded_verbatim() {
    let logger = MockServer::start_async().await;
    let log_mock = logger
        .mock_async(|when, then| {
            when.method(POST).path("/log").json_body(json!({
                "name": "event",
                "data": "something happened",
            }));
            then.status(202)
                .json_body(json!({ "error": false, "message": "logged" }));
        })
        .await;

    let forwarder = LogForwarder::new(logger.url("/log")).unwrap();
    forwarder.handle(event()).await.unwrap();

    log_mock.assert_async().await;
}

#[tokio::test]
async fn a_rejected_forward_is_reported_to_the_caller() {
    let logger = MockServer::start_async().await;
    logger
        .mock_async(|when, then| {
            when.method(POST).path("/log");
            then.status(500);
        })
        .await;

    let forwarder = LogForwarder::new(logger.url("/log")).unwrap();
    let err = forwarder.handle(event()).await.unwrap_err();

    match err {
        Error::Handler(message) => assert!(message.contains("500")),
        other => panic!("expected a handler error, got {:?}", other),
    }
}

#[tokio::test]
async fn an_unreachable_log_service_is_reported_to_the_caller() {
    let forwarder = LogForwarder::new("http://127.0.0.1:1/log").unwrap();

    let err = forwarder.handle(event()).await.unwrap_err();
    assert!(matches!(err, Error::Handler(_)));
}
