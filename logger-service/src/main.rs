// Logger Service - persists log events arriving over HTTP, framed
// binary RPC and gRPC into Postgres

use std::sync::Arc;

use logger_service::config::LoggerConfig;
use logger_service::grpc::LogGrpcService;
use logger_service::rpc_server::RpcServer;
use logger_service::store::{LogStore, PgLogStore};
use logs_proto::LogServiceServer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Starting logger service");

    let config = LoggerConfig::from_env();

    let store = match PgLogStore::connect(&config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("database unreachable, giving up: {}", e);
            std::process::exit(1);
        }
    };
    info!("✅ Connected to database");

    store.migrate().await?;
    let store: Arc<dyn LogStore> = Arc::new(store);

    let rpc_listener = tokio::net::TcpListener::bind(&config.rpc_addr).await?;
    info!("✅ RPC listening on: {}", config.rpc_addr);
    let rpc_server = RpcServer::new(Arc::clone(&store));
    tokio::spawn(async move {
        if let Err(e) = rpc_server.serve(rpc_listener).await {
            error!("RPC listener failed: {}", e);
        }
    });

    let grpc_addr: std::net::SocketAddr = config.grpc_addr.parse()?;
    let grpc_service = LogGrpcService::new(Arc::clone(&store));
    info!("✅ gRPC listening on: {}", config.grpc_addr);
    tokio::spawn(async move {
        if let Err(e) = tonic::transport::Server::builder()
            .add_service(LogServiceServer::new(grpc_service))
            .serve(grpc_addr)
            .await
        {
            error!("gRPC server failed: {}", e);
        }
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("✅ HTTP listening on: {}", config.bind_addr);
    info!("  POST /log   - write a log entry");
    info!("  GET  /ping  - health check");

    axum::serve(listener, logger_service::http::router(store)).await?;

    Ok(())
}
