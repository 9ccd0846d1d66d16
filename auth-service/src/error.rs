//! Error type for the authentication surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::ResponseEnvelope;
use thiserror::Error;

use crate::models::StoreError;

/// Failures surfaced by the authentication route.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The submitted body was not a credentials payload.
    #[error("{0}")]
    BadRequest(String),

    /// Unknown email, wrong password or a deactivated account. The
    /// message is deliberately identical in all three cases.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The credential store could not be queried.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The login event could not be reported to the log service.
    #[error("failed to report login: {0}")]
    Reporting(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Store(_) | AuthError::Reporting(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ResponseEnvelope::fail(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_password_failures_are_indistinguishable() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "invalid credentials");
    }
}
