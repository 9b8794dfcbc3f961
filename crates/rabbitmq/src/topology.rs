//! Exchange and queue declarations.

use lapin::options::{ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Channel, ExchangeKind};
use relay_core::{Error, Result};
use tracing::info;

use crate::config::BrokerConfig;

/// Declares the two durable fanout exchanges and the alerts queue, and
/// binds the queue to the inbound exchange with no routing key.
///
/// Idempotent: redeclaring an existing durable entity with the same
/// arguments is a no-op on the broker.
pub async fn declare(channel: &Channel, config: &BrokerConfig) -> Result<()> {
    channel
        .exchange_declare(
            &config.alerts_exchange,
            ExchangeKind::Fanout,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|e| {
            Error::connection(format!(
                "failed to declare exchange {}: {e}",
                config.alerts_exchange
            ))
        })?;

    channel
        .exchange_declare(
            &config.notifications_exchange,
            ExchangeKind::Fanout,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|e| {
            Error::connection(format!(
                "failed to declare exchange {}: {e}",
                config.notifications_exchange
            ))
        })?;

    channel
        .queue_declare(
            &config.alerts_queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|e| {
            Error::connection(format!(
                "failed to declare queue {}: {e}",
                config.alerts_queue
            ))
        })?;

    channel
        .queue_bind(
            &config.alerts_queue,
            &config.alerts_exchange,
            "",
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(|e| {
            Error::connection(format!(
                "failed to bind queue {} to {}: {e}",
                config.alerts_queue, config.alerts_exchange
            ))
        })?;

    info!(
        alerts_exchange = %config.alerts_exchange,
        alerts_queue = %config.alerts_queue,
        notifications_exchange = %config.notifications_exchange,
        "Declared broker topology"
    );

    Ok(())
}
