//! Logger service
//!
//! Persists log events arriving over three concurrent surfaces (HTTP,
//! length-prefixed binary RPC and gRPC), all writing through one shared
//! Postgres-backed store.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod grpc;
pub mod http;
pub mod rpc_server;
pub mod store;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use store::{LogStore, PgLogStore, StoreError};
