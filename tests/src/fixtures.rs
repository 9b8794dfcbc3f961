//! Fixtures for pipeline tests.

use pipeline::PipelineConfig;
use relay_core::AlertRecord;
use serde_json::json;

/// The reference inbound document from the wire schema.
pub fn valid_alert_json() -> Vec<u8> {
    json!({
        "motorId": "MTR-01",
        "timestamp": "2025-07-17T10:15:00Z",
        "sensorType": "vibration",
        "value": 3.2,
        "alertType": "high_vibration"
    })
    .to_string()
    .into_bytes()
}

/// The reference document with one required field removed.
pub fn alert_json_missing(field: &str) -> Vec<u8> {
    let mut doc = json!({
        "motorId": "MTR-01",
        "timestamp": "2025-07-17T10:15:00Z",
        "sensorType": "vibration",
        "value": 3.2,
        "alertType": "high_vibration"
    });
    doc.as_object_mut().unwrap().remove(field);
    doc.to_string().into_bytes()
}

/// The decoded form of [`valid_alert_json`].
pub fn sample_alert() -> AlertRecord {
    AlertRecord {
        motor_id: "MTR-01".into(),
        sensor_type: "vibration".into(),
        timestamp: "2025-07-17T10:15:00Z".parse().unwrap(),
        value: 3.2,
        alert_type: "high_vibration".into(),
    }
}

/// Pipeline config with no retry delay, so tests run instantly.
pub fn fast_pipeline_config() -> PipelineConfig {
    PipelineConfig {
        retry_attempts: 2,
        retry_delay_secs: 0,
    }
}
