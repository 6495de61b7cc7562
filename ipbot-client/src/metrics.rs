//! Advisory request counters.
//!
//! Updated from concurrent dispatch tasks with relaxed atomics; readings are
//! observability only and never feed back into retry or routing decisions,
//! so a lost increment or a racy average is acceptable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct ClientMetrics {
    requests: AtomicU64,
    errors: AtomicU64,
    retries: AtomicU64,
    rate_limit_hits: AtomicU64,
    avg_latency_us: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub errors: u64,
    pub retries: u64,
    pub rate_limit_hits: u64,
    pub avg_latency_us: u64,
}

impl ClientMetrics {
    pub(crate) fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rate_limit(&self) {
        self.rate_limit_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Exponentially weighted rolling average, 1/8 new sample weight.
    pub(crate) fn record_latency(&self, elapsed: Duration) {
        let sample = elapsed.as_micros() as u64;
        let previous = self.avg_latency_us.load(Ordering::Relaxed);
        let next = if previous == 0 {
            sample
        } else {
            (previous * 7 + sample) / 8
        };
        self.avg_latency_us.store(next, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            rate_limit_hits: self.rate_limit_hits.load(Ordering::Relaxed),
            avg_latency_us: self.avg_latency_us.load(Ordering::Relaxed),
        }
    }
}
