//! Disposition tests for the per-delivery state machine.
//!
//! Every scenario must end in exactly one terminal disposition, and a
//! durable insert must always lead to an ack regardless of the publish
//! outcome.

use integration_tests::fixtures;
use integration_tests::mocks::{MockPublisher, MockStore};
use pipeline::{process_payload, Disposition};

#[tokio::test]
async fn valid_message_is_acked_stored_and_republished() {
    let store = MockStore::new();
    let publisher = MockPublisher::new();
    let config = fixtures::fast_pipeline_config();

    let disposition =
        process_payload(&fixtures::valid_alert_json(), &store, &publisher, &config).await;

    assert_eq!(disposition, Disposition::Ack);

    let rows = store.inserted();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].motor_id, "MTR-01");
    assert_eq!(rows[0].value, 3.2);

    let notifications = publisher.published();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].alert_id, 1);
    assert_eq!(notifications[0].motor_id, "MTR-01");
    assert_eq!(notifications[0].alert_type, "high_vibration");
}

#[tokio::test]
async fn malformed_message_is_nacked_with_no_row_or_notification() {
    let store = MockStore::new();
    let publisher = MockPublisher::new();
    let config = fixtures::fast_pipeline_config();

    let disposition = process_payload(
        &fixtures::alert_json_missing("alertType"),
        &store,
        &publisher,
        &config,
    )
    .await;

    assert_eq!(disposition, Disposition::NackDiscard);
    assert_eq!(store.row_count(), 0);
    assert_eq!(store.attempt_count(), 0);
    assert_eq!(publisher.published_count(), 0);
}

#[tokio::test]
async fn each_missing_field_is_rejected_before_the_store_is_touched() {
    for field in ["motorId", "timestamp", "sensorType", "value", "alertType"] {
        let store = MockStore::new();
        let publisher = MockPublisher::new();
        let config = fixtures::fast_pipeline_config();

        let disposition =
            process_payload(&fixtures::alert_json_missing(field), &store, &publisher, &config)
                .await;

        assert_eq!(
            disposition,
            Disposition::NackDiscard,
            "payload missing {field} should be rejected"
        );
        assert_eq!(store.attempt_count(), 0);
    }
}

#[tokio::test]
async fn poison_message_does_not_affect_the_next_delivery() {
    let store = MockStore::new();
    let publisher = MockPublisher::new();
    let config = fixtures::fast_pipeline_config();

    let poison =
        process_payload(b"not json at all", &store, &publisher, &config).await;
    let valid =
        process_payload(&fixtures::valid_alert_json(), &store, &publisher, &config).await;

    assert_eq!(poison, Disposition::NackDiscard);
    assert_eq!(valid, Disposition::Ack);
    assert_eq!(store.row_count(), 1);
    assert_eq!(store.inserted()[0].motor_id, "MTR-01");
    assert_eq!(publisher.published_count(), 1);
}

#[tokio::test]
async fn publish_failure_still_acks_after_a_durable_insert() {
    let store = MockStore::new();
    let publisher = MockPublisher::new();
    publisher.set_should_fail(true);
    let config = fixtures::fast_pipeline_config();

    let disposition =
        process_payload(&fixtures::valid_alert_json(), &store, &publisher, &config).await;

    // The row is the source of truth; a nack here would duplicate it
    // on redelivery.
    assert_eq!(disposition, Disposition::Ack);
    assert_eq!(store.row_count(), 1);
    assert_eq!(publisher.published_count(), 0);
}

#[tokio::test]
async fn notification_reparses_to_the_same_domain_values() {
    let store = MockStore::new();
    let publisher = MockPublisher::new();
    let config = fixtures::fast_pipeline_config();

    process_payload(&fixtures::valid_alert_json(), &store, &publisher, &config).await;

    let notification = &publisher.published()[0];
    let bytes = relay_core::codec::encode(notification).unwrap();
    let wire: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(wire["alertId"], 1);
    assert_eq!(wire["motorId"], "MTR-01");
    assert_eq!(wire["sensorType"], "vibration");
    assert_eq!(wire["value"], 3.2);
    assert_eq!(wire["alertType"], "high_vibration");
    assert_eq!(wire["timestamp"], "2025-07-17T10:15:00+00:00");
    assert!(wire["processedAt"].is_string());
}
