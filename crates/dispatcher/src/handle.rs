//! SinkHandle - one delivery route with its own metrics

use std::sync::Arc;

use bytes::Bytes;
use tracing::{error, info, instrument};

use contracts::{DeliveryStream, SinkRole};

use crate::dispatcher::SinkDelivery;
use crate::error::DispatcherError;
use crate::metrics::SinkMetrics;

/// Handle to a configured sink
pub struct SinkHandle<S> {
    role: SinkRole,
    sink: S,
    metrics: Arc<SinkMetrics>,
}

impl<S: DeliveryStream> SinkHandle<S> {
    pub fn new(role: SinkRole, sink: S) -> Self {
        Self {
            role,
            sink,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        self.sink.name()
    }

    pub fn role(&self) -> SinkRole {
        self.role
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Submit the whole batch in one call
    ///
    /// A sink-reported partial failure is logged and returned in the
    /// delivery; it is never retried. A call that cannot complete is logged
    /// as critical and returned as `DispatcherError::Delivery`.
    #[instrument(
        name = "sink_handle_submit",
        skip(self, records),
        fields(sink = %self.sink.name(), role = %self.role, records = records.len())
    )]
    pub async fn submit(&mut self, records: &[Bytes]) -> Result<SinkDelivery, DispatcherError> {
        self.metrics.inc_call_count();

        let response = match self.sink.put_record_batch(records).await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.inc_call_failure_count();
                observability::record_sink_call_failure(self.sink.name());
                error!(
                    severity = observability::CRITICAL,
                    sink = %self.sink.name(),
                    role = %self.role,
                    error = %e,
                    "CRITICAL: Error putting records to {} Firehose: {}",
                    self.role,
                    e
                );
                return Err(DispatcherError::delivery(self.role, self.sink.name(), e));
            }
        };

        let failed = response.failed_put_count;
        self.metrics.add_submitted(records.len());
        self.metrics.add_failed(failed);
        observability::record_sink_delivery(self.sink.name(), records.len(), failed);

        if response.is_partial_failure() {
            let first_error = response.failed_records.first();
            error!(
                sink = %self.sink.name(),
                role = %self.role,
                failed,
                error_code = first_error.map(|f| f.error_code.as_str()).unwrap_or_default(),
                error_message = first_error.map(|f| f.error_message.as_str()).unwrap_or_default(),
                "{} Firehose delivery failed for {} records.",
                self.role,
                failed
            );
        } else {
            info!(
                sink = %self.sink.name(),
                role = %self.role,
                delivered = records.len(),
                "Successfully delivered {} records to {} Firehose.",
                records.len(),
                self.role
            );
        }

        Ok(SinkDelivery {
            sink: self.sink.name().to_string(),
            role: self.role,
            submitted: records.len(),
            failed,
            failed_records: response.failed_records,
        })
    }
}
