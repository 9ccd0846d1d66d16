//! Request dispatch: one submission, one adapter.

use std::str::FromStr;
use std::sync::Arc;

use lapin::Connection;
use relay_core::{AuthPayload, LogPayload, MailPayload, ResponseEnvelope};
use tracing::{debug, info};

use crate::adapters::{
    AdapterError, GrpcLogAdapter, HttpServiceAdapter, LogTransport, QueueLogAdapter, RpcLogAdapter,
};
use crate::config::BrokerConfig;
use crate::envelope::Command;
use crate::error::BrokerError;
use crate::metrics::DISPATCH_TOTAL;

/// The log transports a submission can be routed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRoute {
    /// Framed binary RPC.
    Rpc,
    /// gRPC.
    Grpc,
    /// Topic-exchange publish.
    Queue,
}

impl FromStr for LogRoute {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rpc" => Ok(LogRoute::Rpc),
            "grpc" => Ok(LogRoute::Grpc),
            "queue" => Ok(LogRoute::Queue),
            other => Err(format!("unknown log transport {:?}", other)),
        }
    }
}

/// The three log transports, one instance each.
pub struct LogRoutes {
    /// Framed binary RPC transport.
    pub rpc: Arc<dyn LogTransport>,
    /// gRPC transport.
    pub grpc: Arc<dyn LogTransport>,
    /// Queue publish transport.
    pub queue: Arc<dyn LogTransport>,
}

impl LogRoutes {
    fn get(&self, route: LogRoute) -> &dyn LogTransport {
        match route {
            LogRoute::Rpc => self.rpc.as_ref(),
            LogRoute::Grpc => self.grpc.as_ref(),
            LogRoute::Queue => self.queue.as_ref(),
        }
    }
}

/// Routes each validated command to exactly one downstream adapter and
/// maps transport failures onto the broker's error taxonomy.
pub struct Dispatcher {
    auth_service: HttpServiceAdapter,
    mail_service: HttpServiceAdapter,
    log_routes: LogRoutes,
    default_log_route: LogRoute,
}

impl Dispatcher {
    /// Assembles a dispatcher from explicit parts.
    pub fn new(
        auth_service: HttpServiceAdapter,
        mail_service: HttpServiceAdapter,
        log_routes: LogRoutes,
        default_log_route: LogRoute,
    ) -> Self {
        Self {
            auth_service,
            mail_service,
            log_routes,
            default_log_route,
        }
    }

    /// Builds the production adapter set from configuration, publishing
    /// over the shared AMQP connection.
    pub fn from_config(
        config: &BrokerConfig,
        amqp: Arc<Connection>,
    ) -> Result<Self, BrokerError> {
        let auth_service = HttpServiceAdapter::new("authentication service", &config.auth_service_url)
            .map_err(|e| BrokerError::Internal(e.to_string()))?;
        let mail_service = HttpServiceAdapter::new("mail service", &config.mail_service_url)
            .map_err(|e| BrokerError::Internal(e.to_string()))?;
        let log_routes = LogRoutes {
            rpc: Arc::new(RpcLogAdapter::new(&config.logger_rpc_addr)),
            grpc: Arc::new(GrpcLogAdapter::new(&config.logger_grpc_url)),
            queue: Arc::new(QueueLogAdapter::new(amqp)),
        };
        Ok(Self::new(auth_service, mail_service, log_routes, config.log_transport))
    }

    /// Dispatches one validated command, using the configured default
    /// transport for log submissions.
    pub async fn dispatch(&self, command: Command) -> Result<ResponseEnvelope, BrokerError> {
        match command {
            Command::Auth(credentials) => self.authenticate(&credentials).await,
            Command::Log(entry) => self.relay_log(self.default_log_route, &entry).await,
            Command::Mail(mail) => self.send_mail(&mail).await,
        }
    }

    /// Relays one log entry over an explicitly chosen transport.
    pub async fn relay_log(
        &self,
        route: LogRoute,
        entry: &LogPayload,
    ) -> Result<ResponseEnvelope, BrokerError> {
        let transport = self.log_routes.get(route);
        debug!("relaying log submission via {}", transport.name());

        let outcome = transport.deliver(entry).await;
        self.record("log", transport.name(), &outcome);
        let envelope = outcome.map_err(|e| match e {
            AdapterError::Rejected(message) => BrokerError::DownstreamFailed(message),
            AdapterError::Unavailable(message) => BrokerError::DownstreamUnavailable(message),
            AdapterError::Protocol(message) => BrokerError::DownstreamFailed(message),
        })?;

        info!("log entry relayed via {}", transport.name());
        Ok(envelope)
    }

    async fn authenticate(&self, credentials: &AuthPayload) -> Result<ResponseEnvelope, BrokerError> {
        let outcome = self.auth_service.post_json(credentials).await;
        self.record("auth", "http", &outcome);
        let reply = outcome.map_err(|e| match e {
            AdapterError::Rejected(_) => BrokerError::InvalidCredentials,
            AdapterError::Unavailable(message) => BrokerError::DownstreamUnavailable(message),
            AdapterError::Protocol(message) => BrokerError::DownstreamFailed(message),
        })?;

        info!("authenticated {}", credentials.email);
        Ok(ResponseEnvelope {
            error: false,
            message: "Authenticated!".to_string(),
            data: reply.data,
        })
    }

    async fn send_mail(&self, mail: &MailPayload) -> Result<ResponseEnvelope, BrokerError> {
        let outcome = self.mail_service.post_json(mail).await;
        self.record("mail", "http", &outcome);
        outcome.map_err(|e| match e {
            AdapterError::Rejected(message) => BrokerError::DownstreamFailed(message),
            AdapterError::Unavailable(message) => BrokerError::DownstreamUnavailable(message),
            AdapterError::Protocol(message) => BrokerError::DownstreamFailed(message),
        })?;

        info!("mail request relayed for {}", mail.to);
        Ok(ResponseEnvelope::ok(format!("Message sent to {}", mail.to)))
    }

    fn record<T>(&self, action: &str, transport: &str, outcome: &Result<T, AdapterError>) {
        let status = match outcome {
            Ok(_) => "success",
            Err(_) => "error",
        };
        DISPATCH_TOTAL
            .with_label_values(&[action, transport, status])
            .inc();
    }
}
