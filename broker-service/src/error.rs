//! Error type for the broker's HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::ResponseEnvelope;
use thiserror::Error;

use crate::envelope::MissingPayload;

/// Failures a submission can end in, each mapped to a status code and a
/// failure envelope.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The request never reached an adapter: bad JSON, unknown action or
    /// missing payload.
    #[error("{0}")]
    Rejected(String),

    /// The authentication collaborator turned the credentials down.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A downstream accepted the call but reported a failure.
    #[error("{0}")]
    DownstreamFailed(String),

    /// A downstream could not be reached or did not answer in time.
    #[error("{0}")]
    DownstreamUnavailable(String),

    /// The broker itself failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MissingPayload> for BrokerError {
    fn from(err: MissingPayload) -> Self {
        BrokerError::Rejected(err.to_string())
    }
}

impl IntoResponse for BrokerError {
    fn into_response(self) -> Response {
        let status = match &self {
            BrokerError::Rejected(_) => StatusCode::BAD_REQUEST,
            BrokerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            BrokerError::DownstreamFailed(_) | BrokerError::DownstreamUnavailable(_) => {
                StatusCode::BAD_GATEWAY
            }
            BrokerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ResponseEnvelope::fail(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_failure_class() {
        assert_eq!(
            BrokerError::Rejected("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BrokerError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            BrokerError::DownstreamUnavailable("down".into())
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn credential_failures_render_the_fixed_message() {
        assert_eq!(BrokerError::InvalidCredentials.to_string(), "invalid credentials");
    }
}
