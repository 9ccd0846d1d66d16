//! Broker service
//!
//! Public entry point of the relay: accepts request envelopes over HTTP
//! and hands each one to exactly one downstream transport adapter.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod metrics;
pub mod routes;

// Re-exports for convenience
pub use config::BrokerConfig;
pub use dispatch::{Dispatcher, LogRoute, LogRoutes};
pub use envelope::{Action, Command, RequestEnvelope};
pub use error::BrokerError;
pub use routes::{router, AppState};
