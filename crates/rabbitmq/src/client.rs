//! RabbitMQ connection and channel management.

use lapin::options::BasicQosOptions;
use lapin::{Channel, Connection, ConnectionProperties};
use relay_core::{Error, Result};
use tracing::info;

use crate::config::BrokerConfig;
use crate::topology;

/// Broker client owning the connection and its single channel.
///
/// Connection loss is not recovered here: a failed connect is fatal at
/// startup, and a drop during steady state ends the delivery stream so
/// the pipeline can shut down. Redelivery happens on the next start.
pub struct BrokerClient {
    connection: Connection,
    channel: Channel,
    config: BrokerConfig,
}

impl BrokerClient {
    /// Connects to the broker and opens a channel.
    pub async fn connect(config: BrokerConfig) -> Result<Self> {
        let options = ConnectionProperties::default()
            .with_executor(tokio_executor_trait::Tokio::current())
            .with_reactor(tokio_reactor_trait::Tokio);

        let connection = Connection::connect(&config.url, options)
            .await
            .map_err(|e| Error::connection(format!("failed to connect to RabbitMQ: {e}")))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| Error::connection(format!("failed to open channel: {e}")))?;

        info!(
            alerts_exchange = %config.alerts_exchange,
            notifications_exchange = %config.notifications_exchange,
            "Connected to RabbitMQ"
        );

        Ok(Self {
            connection,
            channel,
            config,
        })
    }

    /// Declares the exchanges and queue. Idempotent; safe on every
    /// startup.
    pub async fn declare_topology(&self) -> Result<()> {
        topology::declare(&self.channel, &self.config).await
    }

    /// Caps the number of unacknowledged deliveries held by this
    /// consumer. Must be applied before consumption starts.
    pub async fn set_prefetch(&self, count: u16) -> Result<()> {
        self.channel
            .basic_qos(count, BasicQosOptions::default())
            .await
            .map_err(|e| Error::connection(format!("failed to set prefetch: {e}")))
    }

    /// Whether the underlying connection is still open.
    pub fn is_connected(&self) -> bool {
        self.connection.status().connected()
    }

    /// Closes the broker connection. Part of shutdown sequencing; any
    /// unacknowledged delivery is redelivered on the next connect.
    pub async fn close(&self) -> Result<()> {
        self.connection
            .close(200, "shutdown")
            .await
            .map_err(|e| Error::connection(format!("failed to close connection: {e}")))
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }
}
