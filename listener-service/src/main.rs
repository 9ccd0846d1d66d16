// Listener Service - consumes log events from the topic exchange and
// forwards each one to the log service

use event_bus::EventConsumer;
use listener_service::config::ListenerConfig;
use listener_service::handler::{LogForwarder, LOG_TOPICS};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Starting listener service");

    let config = ListenerConfig::from_env();

    let connection = match event_bus::connect(&config.amqp_url).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("message broker unreachable, giving up: {}", e);
            std::process::exit(1);
        }
    };

    let consumer = EventConsumer::bind(&connection, &LOG_TOPICS).await?;
    let forwarder = LogForwarder::new(&config.logger_service_url)?;

    info!("👂 Listening for log events on {:?}", LOG_TOPICS);
    if let Err(e) = consumer.listen(forwarder).await {
        error!("consumer stopped: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
