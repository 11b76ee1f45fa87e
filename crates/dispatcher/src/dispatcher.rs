//! Dispatcher - submits each batch to the row and column sinks

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info, instrument};

use contracts::{AwsSettings, DeliveryStream, FailedRecord, SinkConfig, SinkRole, SinkRoutes, SinkType};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{AnySink, FileSink, LogSink};

/// Outcome of one completed sink call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkDelivery {
    pub sink: String,
    pub role: SinkRole,
    pub submitted: usize,
    /// Records the sink reported as not persisted
    pub failed: usize,
    pub failed_records: Vec<FailedRecord>,
}

/// Per-batch dispatch report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Completed calls, in submission order
    pub deliveries: Vec<SinkDelivery>,
}

impl DispatchReport {
    /// No sink was called (empty batch)
    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn total_failed(&self) -> usize {
        self.deliveries.iter().map(|d| d.failed).sum()
    }

    pub fn has_partial_failure(&self) -> bool {
        self.total_failed() > 0
    }

    pub fn delivery(&self, role: SinkRole) -> Option<&SinkDelivery> {
        self.deliveries.iter().find(|d| d.role == role)
    }
}

/// Builder for creating a BatchDispatcher from configured routes
pub struct DispatcherBuilder {
    routes: SinkRoutes,
    aws: AwsSettings,
}

impl DispatcherBuilder {
    pub fn new(routes: SinkRoutes, aws: AwsSettings) -> Self {
        Self { routes, aws }
    }

    /// Build both sinks
    ///
    /// Shared AWS configuration is resolved once, and only when a Firehose
    /// route is configured.
    #[instrument(name = "dispatcher_builder_build", skip(self))]
    pub async fn build(self) -> Result<BatchDispatcher, DispatcherError> {
        let factory = SinkFactory::new(&self.routes, &self.aws).await;

        let row = factory.create(&self.routes.row)?;
        let column = factory.create(&self.routes.column)?;

        info!(
            row = %self.routes.row.name,
            column = %self.routes.column.name,
            "Dispatcher ready"
        );
        Ok(BatchDispatcher::new(row, column))
    }
}

struct SinkFactory {
    #[cfg(feature = "aws")]
    sdk_config: Option<config_loader::aws::SdkConfig>,
    timeout: Duration,
}

impl SinkFactory {
    async fn new(routes: &SinkRoutes, aws: &AwsSettings) -> Self {
        let needs_aws = routes
            .ordered()
            .iter()
            .any(|(_, config)| config.sink_type == SinkType::Firehose);

        #[cfg(feature = "aws")]
        let sdk_config = if needs_aws {
            Some(config_loader::aws::load_sdk_config(aws).await)
        } else {
            None
        };
        #[cfg(not(feature = "aws"))]
        let _ = needs_aws;

        Self {
            #[cfg(feature = "aws")]
            sdk_config,
            timeout: Duration::from_secs(aws.timeout_secs),
        }
    }

    /// Create a sink from configuration
    #[instrument(
        name = "dispatcher_create_sink",
        skip(self, config),
        fields(sink = %config.name, sink_type = ?config.sink_type)
    )]
    fn create(&self, config: &SinkConfig) -> Result<AnySink, DispatcherError> {
        match config.sink_type {
            SinkType::Log => Ok(LogSink::new(&config.name).into()),
            SinkType::File => {
                let sink = FileSink::from_params(&config.name, &config.params)
                    .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
                Ok(sink.into())
            }
            #[cfg(feature = "aws")]
            SinkType::Firehose => {
                let sdk_config = self.sdk_config.as_ref().ok_or_else(|| {
                    DispatcherError::sink_creation(&config.name, "AWS configuration not loaded")
                })?;
                Ok(crate::sinks::FirehoseSink::from_sdk_config(
                    &config.name,
                    sdk_config,
                    self.timeout,
                )
                .into())
            }
            #[cfg(not(feature = "aws"))]
            SinkType::Firehose => {
                let _ = self.timeout;
                Err(DispatcherError::sink_creation(
                    &config.name,
                    "firehose sinks require the `aws` feature",
                ))
            }
        }
    }
}

/// Submits normalized batches to the row-store and column-store sinks
///
/// Built once per process and reused across batches.
pub struct BatchDispatcher<S = AnySink> {
    row: SinkHandle<S>,
    column: SinkHandle<S>,
}

impl<S: DeliveryStream> BatchDispatcher<S> {
    /// Create a dispatcher over two ready sinks
    pub fn new(row: S, column: S) -> Self {
        Self {
            row: SinkHandle::new(SinkRole::Row, row),
            column: SinkHandle::new(SinkRole::Column, column),
        }
    }

    /// Sink names in submission order
    pub fn sink_names(&self) -> [&str; 2] {
        [self.row.name(), self.column.name()]
    }

    /// Get metrics for both sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        [&self.row, &self.column]
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Submit one batch to the row sink, then the column sink
    ///
    /// An empty batch makes no calls. Partial failures are reported, not
    /// retried. A call-level failure on the row sink returns immediately and
    /// the column sink is not called.
    #[instrument(name = "dispatcher_dispatch", skip(self, records), fields(records = records.len()))]
    pub async fn dispatch(&mut self, records: &[Bytes]) -> Result<DispatchReport, DispatcherError> {
        if records.is_empty() {
            debug!("No records to dispatch");
            return Ok(DispatchReport::default());
        }

        let row = self.row.submit(records).await?;
        let column = self.column.submit(records).await?;

        Ok(DispatchReport {
            deliveries: vec![row, column],
        })
    }
}

/// Convenience function to create a dispatcher from configured routes
#[instrument(name = "dispatcher_create", skip(routes, aws))]
pub async fn create_dispatcher(
    routes: &SinkRoutes,
    aws: &AwsSettings,
) -> Result<BatchDispatcher, DispatcherError> {
    DispatcherBuilder::new(routes.clone(), aws.clone())
        .build()
        .await
}
