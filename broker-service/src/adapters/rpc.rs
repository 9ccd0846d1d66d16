//! Framed binary RPC adapter for the log service.

use std::time::Duration;

use async_trait::async_trait;
use relay_core::rpc::{self, RpcRequest, RpcResponse};
use relay_core::{LogPayload, ResponseEnvelope};
use tokio::net::TcpStream;
use tracing::debug;

use super::{AdapterError, LogTransport, Result};

/// Budget for connect, call and response together.
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends log entries over a fresh TCP connection per call.
pub struct RpcLogAdapter {
    addr: String,
}

impl RpcLogAdapter {
    /// Adapter calling the log service's RPC listener at `addr`.
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    async fn call(&self, entry: &LogPayload) -> Result<ResponseEnvelope> {
        let mut stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| AdapterError::Unavailable(format!("log service RPC: {}", e)))?;

        let request = RpcRequest {
            method: rpc::LOG_INFO_METHOD.to_string(),
            payload: entry.clone(),
        };
        rpc::write_frame(&mut stream, &request)
            .await
            .map_err(|e| AdapterError::Unavailable(format!("log service RPC: {}", e)))?;

        let response: RpcResponse = rpc::read_frame(&mut stream)
            .await
            .map_err(|e| AdapterError::Protocol(format!("log service RPC: {}", e)))?;

        match response.into_result() {
            Ok(result) => Ok(ResponseEnvelope::ok(result)),
            Err(message) => Err(AdapterError::Rejected(message)),
        }
    }
}

#[async_trait]
impl LogTransport for RpcLogAdapter {
    fn name(&self) -> &'static str {
        "rpc"
    }

    async fn deliver(&self, entry: &LogPayload) -> Result<ResponseEnvelope> {
        debug!("relaying log entry {:?} over RPC to {}", entry.name, self.addr);
        tokio::time::timeout(CALL_TIMEOUT, self.call(entry))
            .await
            .map_err(|_| {
                AdapterError::Unavailable(format!(
                    "log service RPC timed out after {:?}",
                    CALL_TIMEOUT
                ))
            })?
    }
}
