//! Downstream transport adapters.
//!
//! Every adapter takes a canonical payload and reports back with a
//! [`ResponseEnvelope`] or a transport-level failure. Adapters never see
//! the HTTP surface; status mapping happens in the dispatcher.

use async_trait::async_trait;
use relay_core::{LogPayload, ResponseEnvelope};
use thiserror::Error;

pub mod grpc;
pub mod http;
pub mod queue;
pub mod rpc;

pub use grpc::GrpcLogAdapter;
pub use http::HttpServiceAdapter;
pub use queue::QueueLogAdapter;
pub use rpc::RpcLogAdapter;

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Transport-level failures, independent of any HTTP status mapping.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The downstream could not be reached or did not answer in time.
    #[error("Connection error: {0}")]
    Unavailable(String),

    /// The downstream answered and turned the request down.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The downstream answered with something this side cannot decode.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// A transport capable of delivering one log entry to the log service.
///
/// The dispatcher selects exactly one implementation per submission;
/// implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait LogTransport: Send + Sync {
    /// Short transport name used in logs and metrics labels.
    fn name(&self) -> &'static str;

    /// Delivers one log entry, returning the downstream's response
    /// envelope on success.
    async fn deliver(&self, entry: &LogPayload) -> Result<ResponseEnvelope>;
}
