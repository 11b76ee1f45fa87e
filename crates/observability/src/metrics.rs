//! Relay metrics
//!
//! Prometheus counters via the `metrics` facade, plus an in-memory aggregator
//! for run summaries.

use std::collections::BTreeMap;

use metrics::{counter, gauge, histogram};

/// Record an incoming change batch
pub fn record_batch_received(events: usize) {
    counter!("cdc_relay_batches_total").increment(1);
    counter!("cdc_relay_events_received_total").increment(events as u64);
    histogram!("cdc_relay_batch_size").record(events as f64);
}

/// Record one emitted envelope
pub fn record_record_emitted(cdc_type: &str) {
    counter!(
        "cdc_relay_records_emitted_total",
        "cdc_type" => cdc_type.to_string()
    )
    .increment(1);
}

/// Record one skipped event
pub fn record_record_skipped(reason: &str) {
    counter!(
        "cdc_relay_records_skipped_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record a completed batch submission to one sink
pub fn record_sink_delivery(sink_name: &str, submitted: usize, failed: usize) {
    counter!(
        "cdc_relay_sink_records_submitted_total",
        "sink" => sink_name.to_string()
    )
    .increment(submitted as u64);

    if failed > 0 {
        counter!(
            "cdc_relay_sink_records_failed_total",
            "sink" => sink_name.to_string()
        )
        .increment(failed as u64);
    }
    gauge!(
        "cdc_relay_sink_last_failed_count",
        "sink" => sink_name.to_string()
    )
    .set(failed as f64);
}

/// Record a submission call that could not complete
pub fn record_sink_call_failure(sink_name: &str) {
    counter!(
        "cdc_relay_sink_call_failures_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);
}

/// Record a crawler trigger
pub fn record_crawler_trigger(crawler: &str, outcome: &str) {
    counter!(
        "cdc_relay_crawler_triggers_total",
        "crawler" => crawler.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Relay metrics aggregator
///
/// Aggregates counts in memory across invocations of one process.
#[derive(Debug, Clone, Default)]
pub struct RelayMetricsAggregator {
    /// Batches processed
    pub batches: u64,

    /// Events examined
    pub events_examined: u64,

    /// Records emitted by the normalizer
    pub records_emitted: u64,

    /// Events skipped by the normalizer
    pub records_skipped: u64,

    /// Batch size statistics
    pub batch_size_stats: RunningStats,

    /// Per-sink delivery counts
    pub sinks: BTreeMap<String, SinkTotals>,
}

/// Per-sink totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkTotals {
    pub submitted: u64,
    pub failed: u64,
}

impl RelayMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one normalized batch
    pub fn update_batch(&mut self, examined: usize, emitted: usize, skipped: usize) {
        self.batches += 1;
        self.events_examined += examined as u64;
        self.records_emitted += emitted as u64;
        self.records_skipped += skipped as u64;
        self.batch_size_stats.push(examined as f64);
    }

    /// Account for one completed sink submission
    pub fn update_sink(&mut self, sink_name: &str, submitted: usize, failed: usize) {
        let totals = self.sinks.entry(sink_name.to_string()).or_default();
        totals.submitted += submitted as u64;
        totals.failed += failed as u64;
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            batches: self.batches,
            events_examined: self.events_examined,
            records_emitted: self.records_emitted,
            records_skipped: self.records_skipped,
            skip_rate: if self.events_examined > 0 {
                self.records_skipped as f64 / self.events_examined as f64 * 100.0
            } else {
                0.0
            },
            batch_size: StatsSummary::from(&self.batch_size_stats),
            sinks: self.sinks.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub batches: u64,
    pub events_examined: u64,
    pub records_emitted: u64,
    pub records_skipped: u64,
    pub skip_rate: f64,
    pub batch_size: StatsSummary,
    pub sinks: BTreeMap<String, SinkTotals>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Relay Metrics Summary ===")?;
        writeln!(f, "Batches: {}", self.batches)?;
        writeln!(f, "Events examined: {}", self.events_examined)?;
        writeln!(f, "Records emitted: {}", self.records_emitted)?;
        writeln!(
            f,
            "Records skipped: {} ({:.2}%)",
            self.records_skipped, self.skip_rate
        )?;
        writeln!(f, "Batch size: {}", self.batch_size)?;

        if !self.sinks.is_empty() {
            writeln!(f, "Sinks:")?;
            for (sink, totals) in &self.sinks {
                writeln!(
                    f,
                    "  {}: submitted={}, failed={}",
                    sink, totals.submitted, totals.failed
                )?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.2} (n={})",
                self.min, self.max, self.mean, self.count
            )
        }
    }
}

/// Online min/max/mean
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
            self.mean += (value - self.mean) / self.count as f64;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
