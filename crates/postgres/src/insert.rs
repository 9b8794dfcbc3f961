//! Alert persistence.

use async_trait::async_trait;
use relay_core::{AlertRecord, Error, Result};
use tracing::debug;

use crate::client::PgStore;

const INSERT_ALERT: &str = r#"
INSERT INTO motor_alerts (motor_id, sensor_type, timestamp, value, alert_type)
VALUES ($1, $2, $3, CAST($4 AS NUMERIC), $5)
RETURNING id
"#;

/// Seam for persisting alerts, implemented by [`PgStore`] and by test
/// mocks.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Atomically appends one row and returns its assigned id.
    async fn insert_alert(&self, alert: &AlertRecord) -> Result<i64>;
}

#[async_trait]
impl AlertStore for PgStore {
    async fn insert_alert(&self, alert: &AlertRecord) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(INSERT_ALERT)
            .bind(&alert.motor_id)
            .bind(&alert.sensor_type)
            .bind(alert.timestamp)
            .bind(alert.value)
            .bind(&alert.alert_type)
            .fetch_one(self.pool())
            .await
            .map_err(|e| Error::store_unavailable(format!("failed to insert alert: {e}")))?;

        debug!(id, motor_id = %alert.motor_id, "Inserted alert");
        Ok(id)
    }
}
