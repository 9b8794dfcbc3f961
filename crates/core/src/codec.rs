//! JSON codec for inbound alerts and outbound notifications.
//!
//! The inbound and outbound documents both use camelCase wire names
//! (`motorId`, `sensorType`, ...). The outbound mapping is fixed for
//! downstream compatibility; do not rename fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::alert::{AlertRecord, NotificationRecord};
use crate::error::{Error, Result};

/// Inbound wire document. All five fields are required and non-null;
/// anything less fails the whole decode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InboundAlert {
    motor_id: String,
    timestamp: String,
    sensor_type: String,
    value: f64,
    alert_type: String,
}

/// Outbound wire document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboundNotification<'a> {
    alert_id: i64,
    motor_id: &'a str,
    sensor_type: &'a str,
    timestamp: String,
    value: f64,
    alert_type: &'a str,
    processed_at: String,
}

/// Decodes inbound message bytes into a validated [`AlertRecord`].
///
/// Fails with [`Error::MalformedMessage`] if the document cannot be
/// parsed, a required field is absent or null, a string field is
/// empty, or the timestamp/value cannot be coerced. Never returns a
/// partial record.
pub fn decode(bytes: &[u8]) -> Result<AlertRecord> {
    let wire: InboundAlert = serde_json::from_slice(bytes)
        .map_err(|e| Error::malformed(format!("invalid alert document: {e}")))?;

    let timestamp = parse_instant(&wire.timestamp)?;

    if !wire.value.is_finite() {
        return Err(Error::malformed(format!(
            "value must be finite, got {}",
            wire.value
        )));
    }

    let record = AlertRecord {
        motor_id: wire.motor_id,
        sensor_type: wire.sensor_type,
        timestamp,
        value: wire.value,
        alert_type: wire.alert_type,
    };

    record
        .validate()
        .map_err(|e| Error::malformed(format!("invalid alert fields: {e}")))?;

    Ok(record)
}

/// Serializes a [`NotificationRecord`] to outbound message bytes.
pub fn encode(notification: &NotificationRecord) -> Result<Vec<u8>> {
    let wire = OutboundNotification {
        alert_id: notification.alert_id,
        motor_id: &notification.motor_id,
        sensor_type: &notification.sensor_type,
        timestamp: notification.timestamp.to_rfc3339(),
        value: notification.value,
        alert_type: &notification.alert_type,
        processed_at: notification.processed_at.to_rfc3339(),
    };

    serde_json::to_vec(&wire)
        .map_err(|e| Error::internal(format!("failed to encode notification: {e}")))
}

/// Parses an ISO-8601 instant, normalizing a trailing `Z` to an
/// explicit UTC offset first.
fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    let normalized = match raw.strip_suffix('Z') {
        Some(prefix) => format!("{prefix}+00:00"),
        None => raw.to_string(),
    };

    DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::malformed(format!("invalid timestamp {raw:?}: {e}")))
}
