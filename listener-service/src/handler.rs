//! Forwards consumed log events to the log service.

use std::time::Duration;

use async_trait::async_trait;
use event_bus::{Error, EventHandler};
use relay_core::LogPayload;
use reqwest::StatusCode;
use tracing::debug;

/// Topic patterns this process binds its queue to.
pub const LOG_TOPICS: [&str; 3] = ["log.INFO", "log.WARNING", "log.ERROR"];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts every consumed event to the log service over HTTP.
pub struct LogForwarder {
    client: reqwest::Client,
    url: String,
}

impl LogForwarder {
    /// Forwarder posting to the log service at `url`.
    pub fn new(url: impl Into<String>) -> event_bus::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Handler(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl EventHandler for LogForwarder {
    async fn handle(&self, event: LogPayload) -> event_bus::Result<()> {
        debug!("forwarding {} event to the log service", event.name);

        let response = self
            .client
            .post(&self.url)
            .json(&event)
            .send()
            .await
            .map_err(|e| Error::Handler(e.to_string()))?;

        if response.status() != StatusCode::ACCEPTED {
            return Err(Error::Handler(format!(
                "log service replied with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
