//! Run statistics.

use std::time::Duration;

use dispatcher::DispatchReport;
use normalizer::NormalizedBatch;
use observability::RelayMetricsAggregator;

/// Statistics across the invocations of one process
#[derive(Debug, Clone, Default)]
pub struct RelayStats {
    /// Invocations that returned a result
    pub invocations: u64,

    /// Invocations that completed with sink-reported failures
    pub degraded_invocations: u64,

    /// Total time spent handling invocations
    pub duration: Duration,

    /// Normalizer and sink counts
    pub metrics: RelayMetricsAggregator,
}

impl RelayStats {
    pub fn record_batch(&mut self, batch: &NormalizedBatch) {
        self.metrics
            .update_batch(batch.examined, batch.emitted(), batch.skipped.total());
    }

    pub fn record_dispatch(&mut self, report: &DispatchReport, elapsed: Duration) {
        self.invocations += 1;
        self.duration += elapsed;
        if report.has_partial_failure() {
            self.degraded_invocations += 1;
        }
        for delivery in &report.deliveries {
            self.metrics
                .update_sink(&delivery.sink, delivery.submitted, delivery.failed);
        }
    }

    /// Print detailed summary to stderr (stdout carries invocation results)
    pub fn print_summary(&self) {
        eprintln!("\n=== Relay Statistics ===\n");
        eprintln!("Invocations: {}", self.invocations);
        eprintln!("Degraded invocations: {}", self.degraded_invocations);
        eprintln!("Duration: {:.3}s", self.duration.as_secs_f64());
        eprintln!();
        eprint!("{}", self.metrics.summary());
        eprintln!();
    }
}
