//! Mock implementations for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use postgres_client::AlertStore;
use rabbitmq::NotificationPublisher;
use relay_core::{AlertRecord, Error, NotificationRecord, Result};
use std::sync::Arc;

/// Mock store that records inserted alerts in memory.
///
/// Implements the same `AlertStore` trait as the real `PgStore`, so
/// tests can verify exactly which rows the pipeline would persist
/// without a running PostgreSQL.
#[derive(Clone, Default)]
pub struct MockStore {
    inserted: Arc<Mutex<Vec<AlertRecord>>>,
    /// Insert attempts, including failed ones.
    attempts: Arc<Mutex<u32>>,
    /// Fail every insert while set.
    should_fail: Arc<Mutex<bool>>,
    /// Fail this many inserts, then recover.
    fail_remaining: Arc<Mutex<u32>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All alerts inserted through this store.
    pub fn inserted(&self) -> Vec<AlertRecord> {
        self.inserted.lock().clone()
    }

    pub fn row_count(&self) -> usize {
        self.inserted.lock().len()
    }

    /// Insert attempts seen, successful or not.
    pub fn attempt_count(&self) -> u32 {
        *self.attempts.lock()
    }

    /// Set persistent failure mode.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    /// Fail the next `n` inserts, then recover.
    pub fn fail_times(&self, n: u32) {
        *self.fail_remaining.lock() = n;
    }
}

#[async_trait]
impl AlertStore for MockStore {
    async fn insert_alert(&self, alert: &AlertRecord) -> Result<i64> {
        *self.attempts.lock() += 1;

        if *self.should_fail.lock() {
            return Err(Error::store_unavailable("mock store failure"));
        }

        {
            let mut remaining = self.fail_remaining.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::store_unavailable("mock transient store failure"));
            }
        }

        let mut rows = self.inserted.lock();
        rows.push(alert.clone());
        Ok(rows.len() as i64)
    }
}

/// Mock publisher that captures notifications in memory.
#[derive(Clone, Default)]
pub struct MockPublisher {
    published: Arc<Mutex<Vec<NotificationRecord>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications published through this publisher.
    pub fn published(&self) -> Vec<NotificationRecord> {
        self.published.lock().clone()
    }

    pub fn published_count(&self) -> usize {
        self.published.lock().len()
    }

    /// Set failure mode for testing the ack-after-publish-failure path.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }
}

#[async_trait]
impl NotificationPublisher for MockPublisher {
    async fn publish(&self, notification: &NotificationRecord) -> Result<()> {
        if *self.should_fail.lock() {
            return Err(Error::publish_failure("mock publish failure"));
        }

        self.published.lock().push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn mock_store_assigns_sequential_ids() {
        let store = MockStore::new();
        let alert = fixtures::sample_alert();

        assert_eq!(store.insert_alert(&alert).await.unwrap(), 1);
        assert_eq!(store.insert_alert(&alert).await.unwrap(), 2);
        assert_eq!(store.row_count(), 2);
        assert_eq!(store.attempt_count(), 2);
    }

    #[tokio::test]
    async fn mock_store_recovers_after_transient_failures() {
        let store = MockStore::new();
        let alert = fixtures::sample_alert();

        store.fail_times(1);
        assert!(store.insert_alert(&alert).await.is_err());
        assert!(store.insert_alert(&alert).await.is_ok());
    }
}
