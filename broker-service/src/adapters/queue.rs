//! Queue adapter publishing log entries onto the topic exchange.

use std::sync::Arc;

use async_trait::async_trait;
use event_bus::Emitter;
use lapin::Connection;
use relay_core::{LogPayload, ResponseEnvelope};
use tokio::sync::Mutex;
use tracing::debug;

use super::{AdapterError, LogTransport, Result};

/// Routing key used for log submissions relayed through the queue.
const LOG_ROUTING_KEY: &str = "log.INFO";

/// Publishes log entries via the shared AMQP connection.
///
/// The emitter (and its channel) is created lazily on first use and kept
/// for the adapter's lifetime. Publishes are serialized behind a mutex:
/// one channel must not see unsynchronized concurrent publishers.
pub struct QueueLogAdapter {
    connection: Arc<Connection>,
    emitter: Mutex<Option<Emitter>>,
}

impl QueueLogAdapter {
    /// Adapter publishing over `connection`.
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            connection,
            emitter: Mutex::new(None),
        }
    }
}

#[async_trait]
impl LogTransport for QueueLogAdapter {
    fn name(&self) -> &'static str {
        "queue"
    }

    async fn deliver(&self, entry: &LogPayload) -> Result<ResponseEnvelope> {
        debug!("relaying log entry {:?} onto the queue", entry.name);

        let mut guard = self.emitter.lock().await;
        if guard.is_none() {
            let emitter = Emitter::bind(&self.connection)
                .await
                .map_err(|e| AdapterError::Unavailable(e.to_string()))?;
            *guard = Some(emitter);
        }
        let emitter = guard
            .as_ref()
            .ok_or_else(|| AdapterError::Unavailable("publisher not initialized".into()))?;

        emitter
            .publish(LOG_ROUTING_KEY, entry)
            .await
            .map_err(|e| AdapterError::Unavailable(e.to_string()))?;

        Ok(ResponseEnvelope::ok("logged via queue"))
    }
}
