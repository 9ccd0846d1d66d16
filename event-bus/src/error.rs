//! Error types for the event bus.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the event bus.
#[derive(Debug, Error)]
pub enum Error {
    /// The broker connection could not be acquired at startup.
    #[error("Broker connection error: {0}")]
    Connect(#[from] relay_core::backoff::AcquireError),

    /// Opening a channel on the shared connection failed.
    #[error("Channel error: {0}")]
    Channel(String),

    /// Declaring or binding topology failed.
    #[error("Topology error: {0}")]
    Topology(String),

    /// A publish did not reach the channel.
    #[error("Publish error: {0}")]
    Publish(String),

    /// The consume stream failed or ended unexpectedly.
    #[error("Consume error: {0}")]
    Consume(String),

    /// An event body could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An event handler reported a failure for one delivery.
    #[error("Handler error: {0}")]
    Handler(String),
}
