//! Notification publishing.

use async_trait::async_trait;
use lapin::options::BasicPublishOptions;
use lapin::{BasicProperties, Channel};
use relay_core::{codec, Error, NotificationRecord, Result};
use tracing::debug;

use crate::client::BrokerClient;

/// Seam for publishing notifications, implemented by [`Publisher`] and
/// by test mocks.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, notification: &NotificationRecord) -> Result<()>;
}

/// Publishes notifications to the outbound fanout exchange.
pub struct Publisher {
    channel: Channel,
    exchange: String,
}

impl Publisher {
    pub fn new(client: &BrokerClient) -> Self {
        Self {
            channel: client.channel().clone(),
            exchange: client.config().notifications_exchange.clone(),
        }
    }

    /// Sends raw bytes to the exchange. Delivery mode 2 marks the
    /// message persistent so it survives a broker restart.
    async fn publish_bytes(&self, payload: &[u8], persistent: bool) -> Result<()> {
        let mut properties =
            BasicProperties::default().with_content_type("application/json".into());
        if persistent {
            properties = properties.with_delivery_mode(2);
        }

        self.channel
            .basic_publish(
                &self.exchange,
                "",
                BasicPublishOptions::default(),
                payload,
                properties,
            )
            .await
            .map_err(|e| Error::publish_failure(format!("failed to publish notification: {e}")))?
            .await
            .map_err(|e| {
                Error::publish_failure(format!("notification publish not confirmed: {e}"))
            })?;

        Ok(())
    }
}

#[async_trait]
impl NotificationPublisher for Publisher {
    async fn publish(&self, notification: &NotificationRecord) -> Result<()> {
        let payload = codec::encode(notification)?;

        // Persistence is mandatory for notifications.
        self.publish_bytes(&payload, true).await?;

        debug!(
            alert_id = notification.alert_id,
            exchange = %self.exchange,
            "Published notification"
        );

        Ok(())
    }
}
