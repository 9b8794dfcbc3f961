//! Alert domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A validated alert decoded from an inbound broker message.
///
/// Decoding is atomic: either all five fields are present and
/// well-typed, or no record is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AlertRecord {
    #[validate(length(min = 1))]
    pub motor_id: String,
    #[validate(length(min = 1))]
    pub sensor_type: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    #[validate(length(min = 1))]
    pub alert_type: String,
}

/// An alert as stored, with its store-assigned id and insert timestamp.
///
/// Rows are insert-only: never updated, never deleted by this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedAlert {
    pub id: i64,
    pub motor_id: String,
    pub sensor_type: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub alert_type: String,
    pub created_at: DateTime<Utc>,
}

/// The enriched notification re-published for downstream consumers.
///
/// Wire-only: exists on the notification exchange, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    pub alert_id: i64,
    pub motor_id: String,
    pub sensor_type: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub alert_type: String,
    pub processed_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Builds the notification for a freshly persisted alert, stamping
    /// the processing time. `processed_at` is independent of the
    /// store's `created_at`.
    pub fn for_persisted(alert: &AlertRecord, alert_id: i64) -> Self {
        Self {
            alert_id,
            motor_id: alert.motor_id.clone(),
            sensor_type: alert.sensor_type.clone(),
            timestamp: alert.timestamp,
            value: alert.value,
            alert_type: alert.alert_type.clone(),
            processed_at: Utc::now(),
        }
    }
}
