//! Authentication service
//!
//! Verifies user credentials against Postgres and reports every
//! successful login to the log service.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod reporter;

pub use config::AuthConfig;
pub use error::AuthError;
pub use handlers::{router, AppState};
pub use models::{PgUserStore, StoreError, User, UserStore};
pub use reporter::LogReporter;
