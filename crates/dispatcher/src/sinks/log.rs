//! LogSink - logs batch summaries via tracing

use bytes::Bytes;
use contracts::{ContractError, DeliveryStream, PutBatchResponse};
use tracing::{debug, info, instrument};

/// Sink that logs batch summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DeliveryStream for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_put_record_batch",
        skip(self, records),
        fields(sink = %self.name, records = records.len())
    )]
    async fn put_record_batch(
        &mut self,
        records: &[Bytes],
    ) -> Result<PutBatchResponse, ContractError> {
        let bytes: usize = records.iter().map(Bytes::len).sum();
        info!(
            sink = %self.name,
            records = records.len(),
            bytes,
            "Record batch received"
        );
        for record in records {
            debug!(sink = %self.name, record = %String::from_utf8_lossy(record).trim_end());
        }
        Ok(PutBatchResponse::accepted())
    }
}
