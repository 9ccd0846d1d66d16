//! Credential verification handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use relay_core::{AuthPayload, ResponseEnvelope};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::error::AuthError;
use crate::models::UserStore;
use crate::reporter::LogReporter;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Credential store.
    pub users: Arc<dyn UserStore>,
    /// Reports login events to the log service.
    pub reporter: Arc<LogReporter>,
}

/// Builds the authentication router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/authenticate", post(authenticate))
        .route("/ping", get(ping))
        .layer(cors)
        .with_state(state)
}

async fn ping() -> &'static str {
    "pong"
}

async fn authenticate(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<ResponseEnvelope>), AuthError> {
    let credentials: AuthPayload = serde_json::from_str(&body)
        .map_err(|e| AuthError::BadRequest(format!("invalid credentials payload: {}", e)))?;

    let user = state
        .users
        .get_by_email(&credentials.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    // A malformed stored hash counts as a mismatch.
    let valid = bcrypt::verify(&credentials.password, &user.password).unwrap_or(false);
    if !valid || !user.active {
        warn!("failed login attempt for {}", credentials.email);
        return Err(AuthError::InvalidCredentials);
    }

    state
        .reporter
        .report("authentication", &format!("{} logged in", user.email))
        .await?;

    info!("authenticated {}", user.email);

    let data = serde_json::to_value(&user).map_err(|e| AuthError::Internal(e.to_string()))?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ResponseEnvelope::with_data(
            format!("Logged in user {}", user.email),
            data,
        )),
    ))
}
