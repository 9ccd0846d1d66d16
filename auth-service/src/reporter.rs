//! Login audit reporting to the log service.

use std::time::Duration;

use relay_core::LogPayload;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::AuthError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts audit entries to the log service over HTTP.
pub struct LogReporter {
    client: reqwest::Client,
    url: String,
}

impl LogReporter {
    /// Reporter posting to the log service at `url`.
    pub fn new(url: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Posts one audit entry. The caller decides whether a failure here
    /// fails the request it was auditing.
    pub async fn report(&self, name: &str, data: &str) -> Result<(), AuthError> {
        let entry = LogPayload {
            name: name.to_string(),
            data: data.to_string(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&entry)
            .send()
            .await
            .map_err(|e| AuthError::Reporting(e.to_string()))?;

        if response.status() != StatusCode::ACCEPTED {
            return Err(AuthError::Reporting(format!(
                "log service replied with status {}",
                response.status()
            )));
        }

        debug!("reported {} event to the log service", name);
        Ok(())
    }
}
