//! Log entry persistence.

use std::time::Duration;

use async_trait::async_trait;
use relay_core::backoff::{self, AcquireError, Policy};
use relay_core::LogPayload;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Failed connection attempts tolerated before the process gives up.
pub const CONNECT_MAX_FAILURES: u32 = 10;

/// Pause between database connection attempts.
const CONNECT_RETRY_PAUSE: Duration = Duration::from_secs(2);

/// Storage failure.
#[derive(Debug, Error)]
#[error("Database error: {0}")]
pub struct StoreError(#[from] sqlx::Error);

/// Sink for log entries. The production implementation writes Postgres;
/// tests substitute an in-memory one.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Persists one entry and returns its row id.
    async fn insert(&self, entry: &LogPayload) -> Result<Uuid, StoreError>;
}

/// Postgres-backed store.
pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
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
impl LogStore for PgLogStore {
    async fn insert(&self, entry: &LogPayload) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO log_entries (id, name, data) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&entry.name)
            .bind(&entry.data)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }
}
