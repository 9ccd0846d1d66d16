//! Fire-and-forget event publishing.

use lapin::options::BasicPublishOptions;
use lapin::{BasicProperties, Channel, Connection};
use rand::distributions::Alphanumeric;
use rand::Rng;
use relay_core::LogPayload;
use tracing::debug;

use crate::error::{Error, Result};
use crate::metrics::EVENT_PUBLISH_TOTAL;
use crate::topology;

/// Publishes log events onto the shared topic exchange.
///
/// One emitter owns one channel. A channel must not be used by
/// unsynchronized concurrent publishers; callers publishing from many
/// tasks either serialize access or bind one emitter per task.
pub struct Emitter {
    channel: Channel,
}

impl Emitter {
    /// Opens a channel on `connection` and ensures the exchange exists.
    pub async fn bind(connection: &Connection) -> Result<Self> {
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| Error::Channel(e.to_string()))?;
        topology::declare_log_exchange(&channel).await?;
        Ok(Self { channel })
    }

    /// Publishes one event under `routing_key`.
    ///
    /// Returns once the channel accepts the publish; no broker
    /// acknowledgment is awaited, so delivery is at-most-once.
    pub async fn publish(&self, routing_key: &str, event: &LogPayload) -> Result<()> {
        let body = serde_json::to_vec(event)?;
        let correlation_id = correlation_id();
        debug!(
            "publishing {} event {} ({} bytes)",
            routing_key,
            correlation_id,
            body.len()
        );

        let properties = BasicProperties::default()
            .with_content_type("application/json".into())
            .with_correlation_id(correlation_id.into());

        let published = self
            .channel
            .basic_publish(
                topology::LOG_EXCHANGE,
                routing_key,
                BasicPublishOptions::default(),
                &body,
                properties,
            )
            .await;

        match published {
            Ok(_confirm) => {
                EVENT_PUBLISH_TOTAL
                    .with_label_values(&[routing_key, "success"])
                    .inc();
                Ok(())
            }
            Err(e) => {
                EVENT_PUBLISH_TOTAL
                    .with_label_values(&[routing_key, "error"])
                    .inc();
                Err(Error::Publish(e.to_string()))
            }
        }
    }
}

/// Short random id attached to each published event for tracing.
fn correlation_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_ids_are_short_and_alphanumeric() {
        let id = correlation_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn correlation_ids_vary_between_events() {
        assert_ne!(correlation_id(), correlation_id());
    }
}
