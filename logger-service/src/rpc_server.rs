//! Length-prefixed binary RPC ingestion surface.

use std::io;
use std::sync::Arc;

use relay_core::rpc::{self, RpcRequest, RpcResponse};
use tokio::net::{TcpListener, TcpStream};
use tracing::warn;

use crate::store::LogStore;

/// Serves the framed log RPC: one listener, one task per connection.
pub struct RpcServer {
    store: Arc<dyn LogStore>,
}

impl RpcServer {
    /// Server persisting into `store`.
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Accept loop. Returns only if the listener itself fails.
    pub async fn serve(self, listener: TcpListener) -> io::Result<()> {
        let server = Arc::new(self);
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                if let Err(e) = server.handle_connection(stream).await {
                    warn!("RPC connection from {} ended with error: {}", peer, e);
                }
            });
        }
    }

    // A connection carries any number of calls; a clean EOF ends it.
    async fn handle_connection(&self, mut stream: TcpStream) -> io::Result<()> {
        loop {
            let request: RpcRequest = match rpc::read_frame(&mut stream).await {
                Ok(request) => request,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Err(e) => return Err(e),
            };

            let response = self.dispatch(request).await;
            rpc::write_frame(&mut stream, &response).await?;
        }
    }

    async fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        match request.method.as_str() {
            rpc::LOG_INFO_METHOD => match self.store.insert(&request.payload).await {
                Ok(_) => RpcResponse::Ok(format!(
                    "Processed payload via RPC: {}",
                    request.payload.name
                )),
                Err(e) => RpcResponse::Err(format!("failed to persist log entry: {}", e)),
            },
            other => RpcResponse::Err(format!("unknown RPC method: {}", other)),
        }
    }
}
