//! # Dispatcher
//!
//! Batch delivery module.
//!
//! Responsibilities:
//! - Submit one normalized batch to the row-store and column-store sinks
//! - Account for sink-reported partial failures without retrying
//! - Propagate call-level failures, skipping any remaining sink
//!
//! ## Feature Flags
//!
//! - `aws`: Enable the Kinesis Data Firehose sink

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{DeliveryStream, PutBatchResponse, SinkRole};
pub use dispatcher::{
    create_dispatcher, BatchDispatcher, DispatchReport, DispatcherBuilder, SinkDelivery,
};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{
    AnySink, CallJournal, FileSink, FileSinkConfig, LogSink, MockBehavior, MockDeliveryStream,
};

#[cfg(feature = "aws")]
pub use sinks::FirehoseSink;
