//! Dispatch scenarios with the HTTP collaborators stubbed out.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use broker_service::adapters::{self, HttpServiceAdapter, LogTransport};
use broker_service::{AppState, BrokerError, Command, Dispatcher, LogRoute, LogRoutes};
use httpmock::prelude::*;
use relay_core::{AuthPayload, LogPayload, MailPayload, ResponseEnvelope};

/// Records deliveries instead of reaching any downstream.
#[derive(Default)]
struct SpyTransport {
    calls: Mutex<Vec<LogPayload>>,
}

impl SpyTransport {
    fn hits(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LogTransport for SpyTransport {
    fn name(&self) -> &'static str {
        "spy"
    }

    async fn deliver(&self, entry: &LogPayload) -> adapters::Result<ResponseEnvelope> {
        self.calls.lock().unwrap().push(entry.clone());
        Ok(ResponseEnvelope::ok("logged"))
    }
}

fn dispatcher_with(
    auth_url: &str,
    mail_url: &str,
) -> (Dispatcher, Arc<SpyTransport>, Arc<SpyTransport>, Arc<SpyTransport>) {
    let rpc = Arc::new(SpyTransport::default());
    let grpc = Arc::new(SpyTransport::default());
    let queue = Arc::new(SpyTransport::default());
    let dispatcher = Dispatcher::new(
        HttpServiceAdapter::new("authentication service", auth_url).unwrap(),
        HttpServiceAdapter::new("mail service", mail_url).unwrap(),
        LogRoutes {
            rpc: rpc.clone(),
            grpc: grpc.clone(),
            queue: queue.clone(),
        },
        LogRoute::Rpc,
    );
    (dispatcher, rpc, grpc, queue)
}

fn credentials() -> AuthPayload {
    AuthPayload {
        email: "admin@example.com".into(),
        password: "verysecret".into(),
    }
}

#[tokio::test]
async fn an_auth_submission_rides_http_and_carries_the_data_through() {
    let server = MockServer::start_async().await;
    let auth_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/authenticate");
            then.status(202).json_body(serde_json::json!({
                "error": false,
                "message": "Logged in user admin@example.com",
                "data": {"email": "admin@example.com", "active": true}
            }));
        })
        .await;

    let (dispatcher, rpc, grpc, queue) =
        dispatcher_with(&server.url("/authenticate"), &server.url("/send"));

    let reply = dispatcher
        .dispatch(Command::Auth(credentials()))
        .await
        .unwrap();

    auth_mock.assert_async().await;
    assert_eq!(reply.message, "Authenticated!");
    assert_eq!(reply.data.unwrap()["email"], "admin@example.com");
    assert_eq!(rpc.hits() + grpc.hits() + queue.hits(), 0);
}

#[tokio::test]
async fn a_401_maps_to_invalid_credentials_not_a_generic_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/authenticate");
            then.status(401);
        })
        .await;

    let (dispatcher, ..) = dispatcher_with(&server.url("/authenticate"), &server.url("/send"));

    let error = dispatcher
        .dispatch(Command::Auth(credentials()))
        .await
        .unwrap_err();

    assert!(matches!(error, BrokerError::InvalidCredentials));
    assert_eq!(error.to_string(), "invalid credentials");
}

#[tokio::test]
async fn an_accepted_reply_with_an_error_envelope_is_escalated() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/authenticate");
            then.status(202).json_body(serde_json::json!({
                "error": true,
                "message": "authentication error"
            }));
        })
        .await;

    let (dispatcher, ..) = dispatcher_with(&server.url("/authenticate"), &server.url("/send"));

    let error = dispatcher
        .dispatch(Command::Auth(credentials()))
        .await
        .unwrap_err();

    assert!(matches!(error, BrokerError::InvalidCredentials));
}

#[tokio::test]
async fn an_unreachable_collaborator_surfaces_as_downstream_unavailable() {
    // Nothing listens on port 1.
    let (dispatcher, rpc, grpc, queue) =
        dispatcher_with("http://127.0.0.1:1/authenticate", "http://127.0.0.1:1/send");

    let error = dispatcher
        .dispatch(Command::Auth(credentials()))
        .await
        .unwrap_err();

    assert!(matches!(error, BrokerError::DownstreamUnavailable(_)));
    assert_eq!(rpc.hits() + grpc.hits() + queue.hits(), 0);
}

#[tokio::test]
async fn a_mail_submission_reports_the_recipient() {
    let server = MockServer::start_async().await;
    let auth_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/authenticate");
            then.status(202);
        })
        .await;
    let mail_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/send");
            then.status(202).json_body(serde_json::json!({
                "error": false,
                "message": "sent"
            }));
        })
        .await;

    let (dispatcher, ..) = dispatcher_with(&server.url("/authenticate"), &server.url("/send"));

    let reply = dispatcher
        .dispatch(Command::Mail(MailPayload {
            from: "me@example.com".into(),
            to: "you@example.com".into(),
            subject: "hello".into(),
            message: "via the broker".into(),
        }))
        .await
        .unwrap();

    mail_mock.assert_async().await;
    assert_eq!(auth_mock.hits_async().await, 0);
    assert_eq!(reply.message, "Message sent to you@example.com");
}

#[tokio::test]
async fn repeating_a_submission_yields_the_same_outcome() {
    let server = MockServer::start_async().await;
    let auth_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/authenticate");
            then.status(202).json_body(serde_json::json!({
                "error": false,
                "message": "Logged in user admin@example.com",
                "data": {"email": "admin@example.com"}
            }));
        })
        .await;

    let (dispatcher, ..) = dispatcher_with(&server.url("/authenticate"), &server.url("/send"));

    let first = dispatcher.dispatch(Command::Auth(credentials())).await.unwrap();
    let second = dispatcher.dispatch(Command::Auth(credentials())).await.unwrap();

    auth_mock.assert_hits_async(2).await;
    assert_eq!(first, second);
}

async fn spawn_broker(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, broker_service::router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn an_unknown_action_is_rejected_before_any_adapter_runs() {
    let server = MockServer::start_async().await;
    let auth_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/authenticate");
            then.status(202);
        })
        .await;
    let mail_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/send");
            then.status(202);
        })
        .await;

    let (dispatcher, rpc, grpc, queue) =
        dispatcher_with(&server.url("/authenticate"), &server.url("/send"));
    let base = spawn_broker(AppState {
        dispatcher: Arc::new(dispatcher),
    })
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/handle", base))
        .json(&serde_json::json!({"action": "ship", "log": {"name": "n", "data": "d"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let envelope: ResponseEnvelope = response.json().await.unwrap();
    assert!(envelope.error);

    assert_eq!(auth_mock.hits_async().await, 0);
    assert_eq!(mail_mock.hits_async().await, 0);
    assert_eq!(rpc.hits() + grpc.hits() + queue.hits(), 0);
}

#[tokio::test]
async fn a_matching_payload_is_required_for_the_action() {
    let server = MockServer::start_async().await;
    let (dispatcher, ..) = dispatcher_with(&server.url("/authenticate"), &server.url("/send"));
    let base = spawn_broker(AppState {
        dispatcher: Arc::new(dispatcher),
    })
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/handle", base))
        .json(&serde_json::json!({"action": "auth"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let envelope: ResponseEnvelope = response.json().await.unwrap();
    assert!(envelope.error);
    assert_eq!(envelope.message, "missing auth payload");
}

#[tokio::test]
async fn the_liveness_routes_answer_without_a_downstream() {
    let server = MockServer::start_async().await;
    let (dispatcher, ..) = dispatcher_with(&server.url("/authenticate"), &server.url("/send"));
    let base = spawn_broker(AppState {
        dispatcher: Arc::new(dispatcher),
    })
    .await;

    let client = reqwest::Client::new();

    let response = client.post(&base).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let envelope: ResponseEnvelope = response.json().await.unwrap();
    assert_eq!(envelope.message, "Hit the broker");

    let pong = client
        .get(format!("{}/ping", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(pong, "pong");
}
