use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    rows_written: AtomicU64,
    pages_fetched: AtomicU64,
    fetch_calls: AtomicU64,
    retype_retries: AtomicU64,
    bytes_received: AtomicU64,
}

/// Counters of one sync run. Cloned handles share the same counters.
#[derive(Debug, Clone)]
pub struct SyncMetrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub rows_written: u64,
    pub pages_fetched: u64,
    pub fetch_calls: u64,
    pub retype_retries: u64,
    pub bytes_received: u64,
}

impl SyncMetrics {
    pub fn new() -> Self {
        SyncMetrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_rows(&self, count: u64) {
        self.inner.rows_written.fetch_add(count, Ordering::Relaxed);
    }

    /// Counts every request sent to the source, empty answers included.
    pub fn increment_fetch_calls(&self) {
        self.inner.fetch_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts non-empty pages only.
    pub fn increment_pages(&self) {
        self.inner.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_retype_retries(&self) {
        self.inner.retype_retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_bytes(&self, count: u64) {
        self.inner.bytes_received.fetch_add(count, Ordering::Relaxed);
    }

    pub fn rows_written(&self) -> u64 {
        self.inner.rows_written.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rows_written: self.inner.rows_written.load(Ordering::Relaxed),
            pages_fetched: self.inner.pages_fetched.load(Ordering::Relaxed),
            fetch_calls: self.inner.fetch_calls.load(Ordering::Relaxed),
            retype_retries: self.inner.retype_retries.load(Ordering::Relaxed),
            bytes_received: self.inner.bytes_received.load(Ordering::Relaxed),
        }
    }
}

impl Default for SyncMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::SyncMetrics;

    #[test]
    fn test_clones_share_counters() {
        let metrics = SyncMetrics::new();
        let handle = metrics.clone();
        handle.increment_rows(50_000);
        handle.increment_fetch_calls();
        metrics.increment_rows(20_000);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.rows_written, 70_000);
        assert_eq!(snapshot.fetch_calls, 1);
        assert_eq!(snapshot.pages_fetched, 0);
    }
}
