//! User records and the credential store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_core::backoff::{self, AcquireError, Policy};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

/// Failed connection attempts tolerated before the process gives up.
pub const CONNECT_MAX_FAILURES: u32 = 10;

/// Pause between database connection attempts.
const CONNECT_RETRY_PAUSE: Duration = Duration::from_secs(2);

/// Row shape of the `users` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Primary key.
    pub id: i32,
    /// Login email, unique per user.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Bcrypt hash. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password: String,
    /// Deactivated users cannot log in.
    pub active: bool,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Credential lookup failure.
#[derive(Debug, Error)]
#[error("Database error: {0}")]
pub struct StoreError(#[from] sqlx::Error);

/// Lookup interface over user records. Tests substitute an in-memory
/// implementation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetches a user by email, if one exists.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Postgres-backed user store.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Connects to Postgres, retrying on a fixed pause while the database
    /// comes up alongside this process.
    pub async fn connect(database_url: &str) -> Result<Self, AcquireError> {
        let pool = backoff::acquire(
            "postgres",
            Policy::Fixed(CONNECT_RETRY_PAUSE),
            CONNECT_MAX_FAILURES,
            || async move {
                PgPoolOptions::new()
                    .max_connections(10)
                    .acquire_timeout(Duration::from_secs(5))
                    .connect(database_url)
                    .await
            },
        )
        .await?;

        Ok(Self { pool })
    }

    /// Applies pending schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, first_name, last_name, password, active, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
