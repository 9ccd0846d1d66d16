//! Error type for the HTTP ingestion surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::ResponseEnvelope;
use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by the HTTP ingestion route.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The submitted body was not a log entry.
    #[error("{0}")]
    BadRequest(String),

    /// The entry could not be persisted.
    #[error("failed to persist log entry: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for LoggerError {
    fn into_response(self) -> Response {
        let status = match &self {
            LoggerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            LoggerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ResponseEnvelope::fail(self.to_string()))).into_response()
    }
}
