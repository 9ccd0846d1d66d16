// Authentication Service - verifies credentials against Postgres and
// reports logins to the log service

use std::sync::Arc;

use auth_service::config::AuthConfig;
use auth_service::handlers::AppState;
use auth_service::models::PgUserStore;
use auth_service::reporter::LogReporter;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Starting authentication service");

    let config = AuthConfig::from_env();

    let store = match PgUserStore::connect(&config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("database unreachable, giving up: {}", e);
            std::process::exit(1);
        }
    };
    info!("✅ Connected to database");

    store.migrate().await?;

    let state = AppState {
        users: Arc::new(store),
        reporter: Arc::new(LogReporter::new(&config.logger_service_url)?),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("✅ HTTP listening on: {}", config.bind_addr);
    info!("  POST /authenticate - verify credentials");
    info!("  GET  /ping         - health check");

    axum::serve(listener, auth_service::router(state)).await?;

    Ok(())
}
