//! Synchronous HTTP/JSON adapter for the auth and mail collaborators.

use std::time::Duration;

use relay_core::ResponseEnvelope;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use super::{AdapterError, Result};

/// Per-request deadline; these collaborators answer quickly or not at all.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A JSON-over-HTTP collaborator reached at one fixed endpoint.
pub struct HttpServiceAdapter {
    name: &'static str,
    url: String,
    client: reqwest::Client,
}

impl HttpServiceAdapter {
    /// Builds an adapter for the collaborator at `url`.
    pub fn new(name: &'static str, url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdapterError::Unavailable(e.to_string()))?;
        Ok(Self {
            name,
            url: url.into(),
            client,
        })
    }

    /// Collaborator name used in logs and failure messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Posts `payload` as JSON and decodes the uniform response envelope.
    ///
    /// An accepted reply whose envelope still carries `error: true` is
    /// escalated to a rejection, and a 401 becomes an explicit
    /// credential rejection. Every other status collapses to a generic
    /// failure so callers never see collaborator internals.
    pub async fn post_json<T: Serialize>(&self, payload: &T) -> Result<ResponseEnvelope> {
        debug!("calling {} at {}", self.name, self.url);
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| AdapterError::Unavailable(format!("{}: {}", self.name, e)))?;

        match response.status() {
            StatusCode::ACCEPTED => {
                let envelope: ResponseEnvelope = response
                    .json()
                    .await
                    .map_err(|e| AdapterError::Protocol(format!("{}: {}", self.name, e)))?;
                if envelope.error {
                    Err(AdapterError::Rejected(envelope.message))
                } else {
                    Ok(envelope)
                }
            }
            StatusCode::UNAUTHORIZED => Err(AdapterError::Rejected("invalid credentials".into())),
            status => Err(AdapterError::Unavailable(format!(
                "error calling {} (status {})",
                self.name, status
            ))),
        }
    }
}
