//! Sink implementations
//!
//! Contains FirehoseSink, FileSink, LogSink and MockDeliveryStream, plus the
//! `AnySink` enum the config-driven factory returns.

mod file;
#[cfg(feature = "aws")]
mod firehose;
mod log;
mod mock;

use bytes::Bytes;
use contracts::{ContractError, DeliveryStream, PutBatchResponse};

pub use self::file::{FileSink, FileSinkConfig};
#[cfg(feature = "aws")]
pub use self::firehose::FirehoseSink;
pub use self::log::LogSink;
pub use self::mock::{CallJournal, MockBehavior, MockDeliveryStream};

/// Any configured sink
pub enum AnySink {
    #[cfg(feature = "aws")]
    Firehose(FirehoseSink),
    File(FileSink),
    Log(LogSink),
    Mock(MockDeliveryStream),
}

impl From<FileSink> for AnySink {
    fn from(sink: FileSink) -> Self {
        Self::File(sink)
    }
}

impl From<LogSink> for AnySink {
    fn from(sink: LogSink) -> Self {
        Self::Log(sink)
    }
}

impl From<MockDeliveryStream> for AnySink {
    fn from(sink: MockDeliveryStream) -> Self {
        Self::Mock(sink)
    }
}

#[cfg(feature = "aws")]
impl From<FirehoseSink> for AnySink {
    fn from(sink: FirehoseSink) -> Self {
        Self::Firehose(sink)
    }
}

impl DeliveryStream for AnySink {
    fn name(&self) -> &str {
        match self {
            #[cfg(feature = "aws")]
            Self::Firehose(sink) => sink.name(),
            Self::File(sink) => sink.name(),
            Self::Log(sink) => sink.name(),
            Self::Mock(sink) => sink.name(),
        }
    }

    async fn put_record_batch(
        &mut self,
        records: &[Bytes],
    ) -> Result<PutBatchResponse, ContractError> {
        match self {
            #[cfg(feature = "aws")]
            Self::Firehose(sink) => sink.put_record_batch(records).await,
            Self::File(sink) => sink.put_record_batch(records).await,
            Self::Log(sink) => sink.put_record_batch(records).await,
            Self::Mock(sink) => sink.put_record_batch(records).await,
        }
    }
}
