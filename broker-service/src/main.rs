// Broker Service - public entry point of the relay
// Accepts request envelopes over HTTP and routes each to one downstream transport

use std::sync::Arc;

use broker_service::{router, AppState, BrokerConfig, Dispatcher};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Starting broker service");

    let config = BrokerConfig::from_env();
    info!(
        "Configuration loaded - default log transport: {:?}",
        config.log_transport
    );

    // The AMQP connection is acquired once and shared for the process
    // lifetime; running without it is not an option.
    let amqp = match event_bus::connect(&config.amqp_url).await {
        Ok(connection) => Arc::new(connection),
        Err(e) => {
            error!("message broker unreachable, giving up: {}", e);
            std::process::exit(1);
        }
    };

    let dispatcher = Dispatcher::from_config(&config, amqp)?;
    let state = AppState {
        dispatcher: Arc::new(dispatcher),
    };

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("✅ Broker listening on: {}", config.bind_addr);
    info!("   POST /        - liveness envelope");
    info!("   POST /handle  - dispatch a submission");
    info!("   POST /log-grpc - log submission via gRPC");
    info!("   GET  /ping    - liveness text");
    info!("   GET  /metrics - Prometheus metrics");

    axum::serve(listener, app).await?;

    Ok(())
}
