//! Bounded insert retry behavior.

use integration_tests::fixtures;
use integration_tests::mocks::{MockPublisher, MockStore};
use pipeline::{process_payload, Disposition};

#[tokio::test]
async fn persistent_store_failure_exhausts_retries_then_nacks() {
    let store = MockStore::new();
    store.set_should_fail(true);
    let publisher = MockPublisher::new();
    let config = fixtures::fast_pipeline_config();

    let disposition =
        process_payload(&fixtures::valid_alert_json(), &store, &publisher, &config).await;

    assert_eq!(disposition, Disposition::NackDiscard);
    // Initial attempt plus two retries.
    assert_eq!(store.attempt_count(), 3);
    assert_eq!(store.row_count(), 0);
    assert_eq!(publisher.published_count(), 0);
}

#[tokio::test]
async fn transient_store_failure_recovers_within_the_retry_budget() {
    let store = MockStore::new();
    store.fail_times(2);
    let publisher = MockPublisher::new();
    let config = fixtures::fast_pipeline_config();

    let disposition =
        process_payload(&fixtures::valid_alert_json(), &store, &publisher, &config).await;

    assert_eq!(disposition, Disposition::Ack);
    assert_eq!(store.attempt_count(), 3);
    assert_eq!(store.row_count(), 1);
    assert_eq!(publisher.published_count(), 1);
}

#[tokio::test]
async fn zero_retries_means_a_single_attempt() {
    let store = MockStore::new();
    store.set_should_fail(true);
    let publisher = MockPublisher::new();
    let config = pipeline::PipelineConfig {
        retry_attempts: 0,
        retry_delay_secs: 0,
    };

    let disposition =
        process_payload(&fixtures::valid_alert_json(), &store, &publisher, &config).await;

    assert_eq!(disposition, Disposition::NackDiscard);
    assert_eq!(store.attempt_count(), 1);
}
