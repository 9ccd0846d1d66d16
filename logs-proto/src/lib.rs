//! Generated gRPC bindings for the log writing service, shared by the
//! server side and its callers.

// Include generated protobuf code
pub mod logs {
    tonic::include_proto!("logs");
}

pub use logs::log_service_client::LogServiceClient;
pub use logs::log_service_server::{LogService, LogServiceServer};
pub use logs::{Log, LogRequest, LogResponse};
