//! Sink metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Submission calls attempted
    call_count: AtomicU64,
    /// Records carried by completed calls
    submitted_count: AtomicU64,
    /// Records the sink reported as not persisted
    failed_count: AtomicU64,
    /// Calls that could not complete
    call_failure_count: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn inc_call_count(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn submitted_count(&self) -> u64 {
        self.submitted_count.load(Ordering::Relaxed)
    }

    pub fn add_submitted(&self, records: usize) {
        self.submitted_count
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    pub fn add_failed(&self, records: usize) {
        self.failed_count.fetch_add(records as u64, Ordering::Relaxed);
    }

    pub fn call_failure_count(&self) -> u64 {
        self.call_failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_call_failure_count(&self) {
        self.call_failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            call_count: self.call_count(),
            submitted_count: self.submitted_count(),
            failed_count: self.failed_count(),
            call_failure_count: self.call_failure_count(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub call_count: u64,
    pub submitted_count: u64,
    pub failed_count: u64,
    pub call_failure_count: u64,
}
