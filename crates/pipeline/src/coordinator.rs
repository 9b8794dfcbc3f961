//! Pipeline coordinator: decode → persist → re-publish → acknowledge.
//!
//! Per-delivery state machine with terminal states acked / nacked:
//! a decode failure or an insert failure (after bounded retry) rejects
//! the delivery without requeue; once the row is durable the delivery
//! is acknowledged even if the notification publish fails, because the
//! database write is the source of truth and redelivering the message
//! would insert a duplicate row.

use futures::StreamExt;
use postgres_client::AlertStore;
use rabbitmq::{consumer, BrokerClient, Delivery, NotificationPublisher};
use relay_core::{codec, AlertRecord, Error, NotificationRecord, Result};
use telemetry::metrics;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;

/// Terminal disposition for one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ack,
    /// Reject without requeue; the broker drops or dead-letters the
    /// message instead of redelivering it.
    NackDiscard,
}

/// Decides the disposition for one payload.
///
/// Returns exactly one disposition per call. The publish step runs
/// after the insert succeeded and can only log a warning; it never
/// downgrades an ack.
pub async fn process_payload<S, P>(
    payload: &[u8],
    store: &S,
    publisher: &P,
    config: &PipelineConfig,
) -> Disposition
where
    S: AlertStore + ?Sized,
    P: NotificationPublisher + ?Sized,
{
    let alert = match codec::decode(payload) {
        Ok(alert) => alert,
        Err(e) => {
            warn!(error = %e, "Rejecting malformed message");
            return Disposition::NackDiscard;
        }
    };

    let alert_id = match insert_with_retry(store, &alert, config).await {
        Ok(id) => id,
        Err(e) => {
            error!(
                motor_id = %alert.motor_id,
                error = %e,
                "Rejecting alert after failed insert"
            );
            return Disposition::NackDiscard;
        }
    };

    let notification = NotificationRecord::for_persisted(&alert, alert_id);
    if let Err(e) = publisher.publish(&notification).await {
        metrics().publish_failures.inc();
        warn!(
            alert_id,
            error = %e,
            "Notification publish failed; acknowledging anyway"
        );
    }

    info!(
        alert_id,
        motor_id = %alert.motor_id,
        sensor_type = %alert.sensor_type,
        value = alert.value,
        "Processed alert"
    );

    Disposition::Ack
}

/// Inserts with bounded fixed-backoff retry. Exhaustion surfaces the
/// last error so the caller rejects the delivery.
async fn insert_with_retry<S>(
    store: &S,
    alert: &AlertRecord,
    config: &PipelineConfig,
) -> Result<i64>
where
    S: AlertStore + ?Sized,
{
    let mut last_error = None;

    for attempt in 0..=config.retry_attempts {
        if attempt > 0 {
            metrics().insert_retries.inc();
            warn!(
                attempt,
                delay_secs = config.retry_delay_secs,
                "Retrying alert insert"
            );
            tokio::time::sleep(config.retry_delay()).await;
        }

        match store.insert_alert(alert).await {
            Ok(id) => return Ok(id),
            Err(e) => last_error = Some(e),
        }
    }

    Err(last_error.unwrap_or_else(|| Error::internal("insert failed with unknown error")))
}

/// Coordinator owning the consume loop.
pub struct PipelineCoordinator<S, P> {
    store: S,
    publisher: P,
    config: PipelineConfig,
}

impl<S, P> PipelineCoordinator<S, P>
where
    S: AlertStore,
    P: NotificationPublisher,
{
    pub fn new(store: S, publisher: P, config: PipelineConfig) -> Self {
        Self {
            store,
            publisher,
            config,
        }
    }

    /// Runs the consume loop until the token is cancelled or the
    /// delivery stream ends (connection loss).
    ///
    /// Deliveries are processed one at a time in arrival order. An
    /// in-flight delivery finishes its current transition before the
    /// loop returns, so nothing is abandoned mid-pipeline; a delivery
    /// left unacknowledged because the connection itself dropped is
    /// redelivered by the broker on the next connect.
    pub async fn run(&self, broker: &BrokerClient, shutdown: CancellationToken) -> Result<()> {
        let mut deliveries = consumer::start(broker).await?;

        info!(
            retry_attempts = self.config.retry_attempts,
            "Pipeline coordinator started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, stopping consumption");
                    break;
                }
                next = deliveries.next() => {
                    match next {
                        Some(Ok(delivery)) => self.handle_delivery(delivery).await,
                        Some(Err(e)) => {
                            error!(error = %e, "Delivery stream error, shutting down");
                            break;
                        }
                        None => {
                            // Stream end means the connection is gone;
                            // treated as a stop signal, not a crash.
                            warn!("Delivery stream closed by broker");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Applies exactly one terminal disposition to the delivery.
    async fn handle_delivery(&self, delivery: Delivery) {
        metrics().deliveries_received.inc();

        let disposition =
            process_payload(&delivery.data, &self.store, &self.publisher, &self.config).await;

        let sent = match disposition {
            Disposition::Ack => {
                metrics().deliveries_acked.inc();
                consumer::ack(&delivery).await
            }
            Disposition::NackDiscard => {
                metrics().deliveries_nacked.inc();
                consumer::nack_discard(&delivery).await
            }
        };

        if let Err(e) = sent {
            // The disposition could not reach the broker, so the
            // delivery stays unacknowledged and will be redelivered on
            // reconnect.
            error!(error = %e, "Failed to send delivery disposition");
        }
    }
}
