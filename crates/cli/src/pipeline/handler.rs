//! RelayHandler - the per-invocation entry point.
//!
//! Sinks are created once and reused for every batch the process handles.

use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use contracts::{InvocationResult, RelayConfig, StreamBatch};
use dispatcher::{create_dispatcher, AnySink, BatchDispatcher, DeliveryStream};
use normalizer::{NormalizedBatch, Normalizer};
use tracing::{info, instrument, warn};

use super::RelayStats;

/// Normalizes one change batch and delivers it to both sinks
pub struct RelayHandler<S = AnySink> {
    normalizer: Normalizer,
    dispatcher: BatchDispatcher<S>,
    stats: RelayStats,
}

impl RelayHandler {
    /// Build sinks from configuration
    pub async fn from_config(config: &RelayConfig) -> Result<Self> {
        let dispatcher = create_dispatcher(&config.sinks, &config.aws)
            .await
            .context("Failed to create sinks")?;
        Ok(Self::new(
            Normalizer::new(config.normalizer.clone()),
            dispatcher,
        ))
    }
}

impl<S: DeliveryStream> RelayHandler<S> {
    pub fn new(normalizer: Normalizer, dispatcher: BatchDispatcher<S>) -> Self {
        Self {
            normalizer,
            dispatcher,
            stats: RelayStats::default(),
        }
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Handle one invocation
    pub async fn handle(&mut self, batch: &StreamBatch) -> Result<InvocationResult> {
        self.handle_at(batch, Utc::now()).await
    }

    /// Handle one invocation with a fixed processing time
    #[instrument(name = "relay_handle", skip(self, batch), fields(events = batch.records.len()))]
    pub async fn handle_at(
        &mut self,
        batch: &StreamBatch,
        processed_at: DateTime<Utc>,
    ) -> Result<InvocationResult> {
        let started = Instant::now();

        let normalized = self.normalize(batch, processed_at);
        let report = self
            .dispatcher
            .dispatch(&normalized.records)
            .await
            .context("Batch delivery failed")?;

        self.stats.record_dispatch(&report, started.elapsed());
        if report.has_partial_failure() {
            warn!(
                failed = report.total_failed(),
                "Batch completed with sink-reported failures"
            );
        }

        info!(
            examined = normalized.examined,
            emitted = normalized.emitted(),
            "Invocation complete"
        );
        Ok(InvocationResult::processed(normalized.examined))
    }

    /// Normalize without delivering
    pub fn normalize(&mut self, batch: &StreamBatch, processed_at: DateTime<Utc>) -> NormalizedBatch {
        let normalized = self.normalizer.normalize_batch(&batch.records, processed_at);
        self.stats.record_batch(&normalized);
        normalized
    }
}
