//! Reporting queries.
//!
//! Read-only collaborators for operational tooling; not part of the
//! ingestion hot path or its invariants.

use chrono::{DateTime, NaiveDate, Utc};
use relay_core::{Error, PersistedAlert, Result};
use serde::Serialize;
use sqlx::FromRow;

use crate::client::PgStore;

const RECENT_ALERTS: &str = r#"
SELECT id, motor_id, sensor_type, timestamp, value::FLOAT8 AS value, alert_type, created_at
FROM motor_alerts
WHERE motor_id = $1
ORDER BY timestamp DESC
LIMIT $2
"#;

const DAILY_ALERT_COUNTS: &str = r#"
SELECT motor_id, DATE(timestamp) AS alert_date, COUNT(*) AS count
FROM motor_alerts
WHERE DATE(timestamp) BETWEEN $1 AND $2
GROUP BY motor_id, DATE(timestamp)
ORDER BY alert_date DESC, motor_id
"#;

#[derive(Debug, FromRow)]
struct AlertRow {
    id: i64,
    motor_id: String,
    sensor_type: String,
    timestamp: DateTime<Utc>,
    value: f64,
    alert_type: String,
    created_at: DateTime<Utc>,
}

impl From<AlertRow> for PersistedAlert {
    fn from(row: AlertRow) -> Self {
        Self {
            id: row.id,
            motor_id: row.motor_id,
            sensor_type: row.sensor_type,
            timestamp: row.timestamp,
            value: row.value,
            alert_type: row.alert_type,
            created_at: row.created_at,
        }
    }
}

/// Per-motor alert count for one day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyAlertCount {
    pub motor_id: String,
    pub alert_date: NaiveDate,
    pub count: i64,
}

/// Recent alerts for one motor, newest event first.
pub async fn recent_alerts(
    store: &PgStore,
    motor_id: &str,
    limit: i64,
) -> Result<Vec<PersistedAlert>> {
    let rows: Vec<AlertRow> = sqlx::query_as(RECENT_ALERTS)
        .bind(motor_id)
        .bind(limit)
        .fetch_all(store.pool())
        .await
        .map_err(|e| Error::store_unavailable(format!("failed to query recent alerts: {e}")))?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Daily alert counts per motor between two dates, inclusive.
pub async fn daily_alert_counts(
    store: &PgStore,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyAlertCount>> {
    sqlx::query_as(DAILY_ALERT_COUNTS)
        .bind(start)
        .bind(end)
        .fetch_all(store.pool())
        .await
        .map_err(|e| Error::store_unavailable(format!("failed to query daily counts: {e}")))
}
