//! Exchange and queue declaration.
//!
//! Declarations are idempotent, so every publisher and consumer declares
//! what it needs before use instead of assuming deployment-time setup.

use lapin::options::{ExchangeDeclareOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Channel, ExchangeKind, Queue};

use crate::error::{Error, Result};

/// Name of the durable topic exchange all log events flow through.
pub const LOG_EXCHANGE: &str = "logs_topic";

/// Declares the durable log exchange on the given channel.
pub async fn declare_log_exchange(channel: &Channel) -> Result<()> {
    channel
        .exchange_declare(
            LOG_EXCHANGE,
            ExchangeKind::Topic,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|e| Error::Topology(e.to_string()))
}

/// Declares an exclusive, broker-named queue for a single consumer.
///
/// The queue is not durable and dies with the connection, so a restarted
/// consumer sees current traffic only.
pub async fn declare_ephemeral_queue(channel: &Channel) -> Result<Queue> {
    channel
        .queue_declare(
            "",
            QueueDeclareOptions {
                exclusive: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|e| Error::Topology(e.to_string()))
}
