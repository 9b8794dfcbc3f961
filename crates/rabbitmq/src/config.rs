//! RabbitMQ configuration.

use serde::{Deserialize, Serialize};

/// Broker client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// AMQP connection URL
    #[serde(default = "default_url")]
    pub url: String,
    /// Durable fanout exchange carrying raw inbound alerts
    #[serde(default = "default_alerts_exchange")]
    pub alerts_exchange: String,
    /// Durable queue bound to the alerts exchange
    #[serde(default = "default_alerts_queue")]
    pub alerts_queue: String,
    /// Durable fanout exchange for enriched notifications
    #[serde(default = "default_notifications_exchange")]
    pub notifications_exchange: String,
    /// Maximum unacknowledged deliveries held by this consumer
    #[serde(default = "default_prefetch_count")]
    pub prefetch_count: u16,
}

fn default_url() -> String {
    "amqp://localhost".to_string()
}

fn default_alerts_exchange() -> String {
    "motor.alerts".to_string()
}

fn default_alerts_queue() -> String {
    "motor.alerts.queue".to_string()
}

fn default_notifications_exchange() -> String {
    "motor.notifications".to_string()
}

fn default_prefetch_count() -> u16 {
    10
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            alerts_exchange: default_alerts_exchange(),
            alerts_queue: default_alerts_queue(),
            notifications_exchange: default_notifications_exchange(),
            prefetch_count: default_prefetch_count(),
        }
    }
}
