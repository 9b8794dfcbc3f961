//! Process-lifetime pipeline counters.
//!
//! In-memory only; the summary is logged once at shutdown.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Pipeline counters.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Deliveries pulled off the alerts queue
    pub deliveries_received: Counter,
    /// Deliveries acknowledged after successful persistence
    pub deliveries_acked: Counter,
    /// Deliveries rejected without requeue
    pub deliveries_nacked: Counter,
    /// Notification publishes that failed after a durable insert
    pub publish_failures: Counter,
    /// Insert attempts retried before a terminal disposition
    pub insert_retries: Counter,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub deliveries_received: u64,
    pub deliveries_acked: u64,
    pub deliveries_nacked: u64,
    pub publish_failures: u64,
    pub insert_retries: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            deliveries_received: self.deliveries_received.get(),
            deliveries_acked: self.deliveries_acked.get(),
            deliveries_nacked: self.deliveries_nacked.get(),
            publish_failures: self.publish_failures.get(),
            insert_retries: self.insert_retries.get(),
        }
    }
}

/// Global metrics instance.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
