//! HTTP ingestion surface.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use relay_core::{LogPayload, ResponseEnvelope};
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use crate::error::LoggerError;
use crate::store::LogStore;

/// Builds the ingestion router over the given store.
pub fn router(store: Arc<dyn LogStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/log", post(write_log))
        .route("/ping", get(ping))
        .layer(cors)
        .with_state(store)
}

async fn ping() -> &'static str {
    "pong"
}

async fn write_log(
    State(store): State<Arc<dyn LogStore>>,
    body: String,
) -> Result<(StatusCode, Json<ResponseEnvelope>), LoggerError> {
    let entry: LogPayload = serde_json::from_str(&body)
        .map_err(|e| LoggerError::BadRequest(format!("invalid log entry: {}", e)))?;

    let id = store.insert(&entry).await?;
    debug!("persisted log entry {} ({})", id, entry.name);

    Ok((StatusCode::ACCEPTED, Json(ResponseEnvelope::ok("logged"))))
}
