//! Listener service
//!
//! Consumes log events from the topic exchange and forwards each one to
//! the log service over HTTP.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod handler;

pub use config::ListenerConfig;
pub use handler::{LogForwarder, LOG_TOPICS};
