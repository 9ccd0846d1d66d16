//! At-most-once event consumption.

use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{BasicConsumeOptions, QueueBindOptions};
use lapin::types::FieldTable;
use lapin::{Channel, Connection};
use relay_core::LogPayload;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::metrics::EVENT_CONSUME_TOTAL;
use crate::topology;

/// Receives events delivered to a consumer's queue.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handles one delivery.
    ///
    /// Errors are logged by the consume loop and do not stop consumption;
    /// with acknowledgments disabled the event is not redelivered.
    async fn handle(&self, event: LogPayload) -> Result<()>;
}

/// A single-queue topic consumer.
///
/// Owns an exclusive broker-named queue bound to one or more topic
/// patterns on the shared log exchange.
pub struct EventConsumer {
    channel: Channel,
    queue: String,
}

impl EventConsumer {
    /// Declares the exchange and an ephemeral queue, binding the queue to
    /// every pattern in `topics`.
    pub async fn bind(connection: &Connection, topics: &[&str]) -> Result<Self> {
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| Error::Channel(e.to_string()))?;
        topology::declare_log_exchange(&channel).await?;
        let queue = topology::declare_ephemeral_queue(&channel).await?;
        let queue_name = queue.name().as_str().to_string();

        for topic in topics {
            channel
                .queue_bind(
                    &queue_name,
                    topology::LOG_EXCHANGE,
                    topic,
                    QueueBindOptions::default(),
                    FieldTable::default(),
                )
                .await
                .map_err(|e| Error::Topology(e.to_string()))?;
            info!("bound queue {} to {}", queue_name, topic);
        }

        Ok(Self {
            channel,
            queue: queue_name,
        })
    }

    /// Queue name assigned by the broker.
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Consumes deliveries until the stream ends, feeding each decoded
    /// event to `handler`.
    ///
    /// Runs with acknowledgments disabled: a delivery is gone once
    /// received, and a handler failure only produces an error log. Returns
    /// an error when the underlying stream fails or the connection closes,
    /// at which point the process should restart to resume consumption.
    pub async fn listen<H: EventHandler>(self, handler: H) -> Result<()> {
        let mut deliveries = self
            .channel
            .basic_consume(
                &self.queue,
                "",
                BasicConsumeOptions {
                    no_ack: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| Error::Consume(e.to_string()))?;

        info!("consuming from queue {}", self.queue);
        while let Some(delivery) = deliveries.next().await {
            let delivery = delivery.map_err(|e| Error::Consume(e.to_string()))?;
            let routing_key = delivery.routing_key.as_str().to_string();

            let event: LogPayload = match serde_json::from_slice(&delivery.data) {
                Ok(event) => event,
                Err(e) => {
                    EVENT_CONSUME_TOTAL
                        .with_label_values(&[routing_key.as_str(), "decode_error"])
                        .inc();
                    warn!("discarding undecodable {} event: {}", routing_key, e);
                    continue;
                }
            };

            match handler.handle(event).await {
                Ok(()) => {
                    EVENT_CONSUME_TOTAL
                        .with_label_values(&[routing_key.as_str(), "success"])
                        .inc();
                }
                Err(e) => {
                    EVENT_CONSUME_TOTAL
                        .with_label_values(&[routing_key.as_str(), "error"])
                        .inc();
                    error!("handler failed for {} event: {}", routing_key, e);
                }
            }
        }

        Err(Error::Consume("delivery stream ended".to_string()))
    }
}
