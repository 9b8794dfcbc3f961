//! Delivery consumption and disposition.
//!
//! Every delivery gets exactly one terminal disposition: [`ack`] on
//! success or [`nack_discard`] on failure. Rejected messages are never
//! requeued; the broker drops or dead-letters them, which keeps a
//! permanently malformed message from looping forever.

use lapin::message::Delivery;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions};
use lapin::types::FieldTable;
use relay_core::{Error, Result};
use tracing::info;

use crate::client::BrokerClient;

/// Consumer tag identifying this process on the broker.
const CONSUMER_TAG: &str = "motor-alert-relay";

/// Starts consuming from the alerts queue.
///
/// The returned consumer is a lazy stream of deliveries that ends only
/// when the channel is cancelled or the connection is lost. No
/// automatic reconnect is attempted.
pub async fn start(client: &BrokerClient) -> Result<lapin::Consumer> {
    let consumer = client
        .channel()
        .basic_consume(
            &client.config().alerts_queue,
            CONSUMER_TAG,
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(|e| Error::connection(format!("failed to start consumer: {e}")))?;

    info!(queue = %client.config().alerts_queue, "Consuming alerts");
    Ok(consumer)
}

/// Acknowledges a delivery, removing it from the broker's
/// unacknowledged set permanently.
pub async fn ack(delivery: &Delivery) -> Result<()> {
    delivery
        .acker
        .ack(BasicAckOptions::default())
        .await
        .map_err(|e| Error::connection(format!("failed to ack delivery: {e}")))
}

/// Rejects a delivery without requeue.
pub async fn nack_discard(delivery: &Delivery) -> Result<()> {
    delivery
        .acker
        .nack(BasicNackOptions {
            requeue: false,
            ..Default::default()
        })
        .await
        .map_err(|e| Error::connection(format!("failed to nack delivery: {e}")))
}
