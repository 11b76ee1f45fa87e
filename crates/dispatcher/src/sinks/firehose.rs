//! FirehoseSink - Kinesis Data Firehose delivery stream

use std::time::Duration;

use aws_sdk_firehose::config::timeout::TimeoutConfig;
use aws_sdk_firehose::error::{DisplayErrorContext, SdkError};
use aws_sdk_firehose::operation::put_record_batch::{PutRecordBatchError, PutRecordBatchOutput};
use aws_sdk_firehose::primitives::Blob;
use aws_sdk_firehose::types::Record;
use aws_sdk_firehose::Client;
use bytes::Bytes;
use config_loader::aws::SdkConfig;
use contracts::{ContractError, DeliveryStream, FailedRecord, PutBatchResponse};
use tracing::{debug, instrument};

/// Sink backed by one Firehose delivery stream
///
/// Each batch becomes exactly one `PutRecordBatch` call.
pub struct FirehoseSink {
    name: String,
    client: Client,
}

impl FirehoseSink {
    /// Wrap an existing client
    pub fn new(name: impl Into<String>, client: Client) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }

    /// Build a client from shared SDK configuration
    pub fn from_sdk_config(name: impl Into<String>, sdk_config: &SdkConfig, timeout: Duration) -> Self {
        let firehose_config = aws_sdk_firehose::config::Builder::from(sdk_config)
            .timeout_config(TimeoutConfig::builder().operation_timeout(timeout).build())
            .build();
        Self::new(name, Client::from_conf(firehose_config))
    }

    fn map_error(&self, err: SdkError<PutRecordBatchError>) -> ContractError {
        let message = DisplayErrorContext(&err).to_string();
        match err {
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
                ContractError::sink_connection(&self.name, message)
            }
            _ => ContractError::sink_delivery(&self.name, message),
        }
    }
}

fn to_response(output: &PutRecordBatchOutput) -> PutBatchResponse {
    let failed_records = output
        .request_responses()
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            entry.error_code().map(|code| FailedRecord {
                index,
                error_code: code.to_string(),
                error_message: entry.error_message().unwrap_or_default().to_string(),
            })
        })
        .collect();

    PutBatchResponse {
        failed_put_count: usize::try_from(output.failed_put_count()).unwrap_or_default(),
        failed_records,
    }
}

impl DeliveryStream for FirehoseSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "firehose_sink_put_record_batch",
        skip(self, records),
        fields(sink = %self.name, records = records.len())
    )]
    async fn put_record_batch(
        &mut self,
        records: &[Bytes],
    ) -> Result<PutBatchResponse, ContractError> {
        let entries = records
            .iter()
            .map(|record| {
                Record::builder()
                    .data(Blob::new(record.to_vec()))
                    .build()
                    .map_err(|e| ContractError::sink_delivery(&self.name, e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .client
            .put_record_batch()
            .delivery_stream_name(&self.name)
            .set_records(Some(entries))
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let response = to_response(&output);
        debug!(
            sink = %self.name,
            failed = response.failed_put_count,
            "PutRecordBatch completed"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_firehose::types::PutRecordBatchResponseEntry;

    #[test]
    fn test_to_response_collects_failed_entries() {
        let output = PutRecordBatchOutput::builder()
            .failed_put_count(1)
            .request_responses(PutRecordBatchResponseEntry::builder().record_id("r0").build())
            .request_responses(
                PutRecordBatchResponseEntry::builder()
                    .error_code("ServiceUnavailableException")
                    .error_message("Slow down.")
                    .build(),
            )
            .build()
            .unwrap();

        let response = to_response(&output);
        assert_eq!(response.failed_put_count, 1);
        assert_eq!(response.failed_records.len(), 1);
        assert_eq!(response.failed_records[0].index, 1);
        assert_eq!(
            response.failed_records[0].error_code,
            "ServiceUnavailableException"
        );
    }
}
