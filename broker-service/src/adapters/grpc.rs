//! gRPC adapter for the log service.

use std::time::Duration;

use async_trait::async_trait;
use logs_proto::{Log, LogRequest, LogServiceClient};
use relay_core::{LogPayload, ResponseEnvelope};
use tonic::transport::Endpoint;
use tracing::debug;

use super::{AdapterError, LogTransport, Result};

/// Per-request deadline. Log writes are fast; anything slower is treated
/// as an outage rather than waited on.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(1);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends log entries over a fresh plaintext channel per call.
pub struct GrpcLogAdapter {
    endpoint: String,
}

impl GrpcLogAdapter {
    /// Adapter calling the log service's gRPC surface at `endpoint`,
    /// e.g. `http://logger-service:50001`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LogTransport for GrpcLogAdapter {
    fn name(&self) -> &'static str {
        "grpc"
    }

    async fn deliver(&self, entry: &LogPayload) -> Result<ResponseEnvelope> {
        debug!("relaying log entry {:?} over gRPC to {}", entry.name, self.endpoint);

        let channel = Endpoint::from_shared(self.endpoint.clone())
            .map_err(|e| AdapterError::Unavailable(format!("log service gRPC: {}", e)))?
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .connect()
            .await
            .map_err(|e| AdapterError::Unavailable(format!("log service gRPC: {}", e)))?;

        let mut client = LogServiceClient::new(channel);
        let request = LogRequest {
            log_entry: Some(Log {
                name: entry.name.clone(),
                data: entry.data.clone(),
            }),
        };

        let reply = client
            .write_log(request)
            .await
            .map_err(|e| AdapterError::Unavailable(format!("log service gRPC: {}", e)))?;

        Ok(ResponseEnvelope::ok(reply.into_inner().result))
    }
}
