//! HTTP surface of the broker.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use relay_core::ResponseEnvelope;
use tower_http::cors::{Any, CorsLayer};

use crate::dispatch::{Dispatcher, LogRoute};
use crate::envelope::RequestEnvelope;
use crate::error::BrokerError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The adapter-selecting dispatcher.
    pub dispatcher: Arc<Dispatcher>,
}

/// Builds the broker router: submission endpoints, liveness and metrics,
/// all behind a permissive CORS layer.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", post(broker_alive))
        .route("/handle", post(handle_submission))
        .route("/log-grpc", post(log_via_grpc))
        .route("/ping", get(ping))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .with_state(state)
}

fn parse_envelope(body: &str) -> Result<RequestEnvelope, BrokerError> {
    serde_json::from_str(body)
        .map_err(|e| BrokerError::Rejected(format!("invalid request envelope: {}", e)))
}

// Liveness probe used by compose healthchecks and the demo frontend
async fn broker_alive() -> (StatusCode, Json<ResponseEnvelope>) {
    (StatusCode::OK, Json(ResponseEnvelope::ok("Hit the broker")))
}

async fn ping() -> &'static str {
    "pong"
}

async fn metrics_handler() -> Result<String, BrokerError> {
    let encoder = prometheus::TextEncoder::new();
    encoder
        .encode_to_string(&prometheus::gather())
        .map_err(|e| BrokerError::Internal(format!("Failed to export metrics: {}", e)))
}

/// One submission in, one adapter out. Log submissions ride the
/// configured default transport.
async fn handle_submission(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<ResponseEnvelope>), BrokerError> {
    let envelope = parse_envelope(&body)?;
    let command = envelope.into_command()?;
    let reply = state.dispatcher.dispatch(command).await?;
    Ok((StatusCode::ACCEPTED, Json(reply)))
}

/// Log submissions that must ride gRPC regardless of the default.
async fn log_via_grpc(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<ResponseEnvelope>), BrokerError> {
    let entry = parse_envelope(&body)?.into_log_entry()?;
    let reply = state.dispatcher.relay_log(LogRoute::Grpc, &entry).await?;
    Ok((StatusCode::ACCEPTED, Json(reply)))
}
