//! Shared foundation for the relay services
//!
//! Provides:
//! - Canonical action payloads and the uniform response envelope
//! - Bounded-retry acquisition of external handles (database, broker)
//! - The length-prefixed frame codec used by the binary log RPC

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod backoff;
pub mod payload;
pub mod rpc;

pub use backoff::{acquire, AcquireError, Policy};
pub use payload::{AuthPayload, LogPayload, MailPayload, ResponseEnvelope};
