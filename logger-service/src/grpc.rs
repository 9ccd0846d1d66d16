//! gRPC ingestion surface.

use std::sync::Arc;

use logs_proto::{Log, LogRequest, LogResponse, LogService};
use relay_core::LogPayload;
use tonic::{Request, Response, Status};
use tracing::debug;

use crate::store::LogStore;

/// gRPC front over the shared store.
pub struct LogGrpcService {
    store: Arc<dyn LogStore>,
}

impl LogGrpcService {
    /// Service persisting into `store`.
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }
}

#[tonic::async_trait]
impl LogService for LogGrpcService {
    async fn write_log(
        &self,
        request: Request<LogRequest>,
    ) -> Result<Response<LogResponse>, Status> {
        let Log { name, data } = request
            .into_inner()
            .log_entry
            .ok_or_else(|| Status::invalid_argument("log entry is required"))?;

        let entry = LogPayload { name, data };
        let id = self
            .store
            .insert(&entry)
            .await
            .map_err(|e| Status::internal(format!("failed to persist log entry: {}", e)))?;
        debug!("persisted log entry {} via gRPC", id);

        Ok(Response::new(LogResponse {
            result: "logged".to_string(),
        }))
    }
}
