//! Topic event bus over AMQP
//!
//! Provides the messaging layer shared by the relay services:
//! - Startup connection acquisition with quadratic backoff
//! - Durable topic-exchange topology declaration
//! - Fire-and-forget event publishing with correlation ids
//! - An at-most-once consumer feeding an [`EventHandler`]

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod consumer;
pub mod emitter;
pub mod error;
pub mod metrics;
pub mod topology;

use lapin::{Connection, ConnectionProperties};
use relay_core::backoff::{self, Policy};
use tracing::info;

pub use consumer::{EventConsumer, EventHandler};
pub use emitter::Emitter;
pub use error::{Error, Result};
pub use topology::LOG_EXCHANGE;

/// Failed broker connection attempts tolerated before giving up.
pub const CONNECT_MAX_FAILURES: u32 = 5;

/// Connects to the AMQP broker, retrying with quadratic backoff.
///
/// Intended for process startup: connections are acquired once and shared
/// for the process lifetime, and on exhaustion the caller should treat
/// the error as fatal and exit.
pub async fn connect(amqp_url: &str) -> Result<Connection> {
    let connection = backoff::acquire(
        "message broker",
        Policy::Quadratic,
        CONNECT_MAX_FAILURES,
        || async move { Connection::connect(amqp_url, ConnectionProperties::default()).await },
    )
    .await?;
    info!("✅ Connected to message broker");
    Ok(connection)
}
