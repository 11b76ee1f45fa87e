//! DeliveryStream trait - Dispatcher output interface
//!
//! Abstracts a durable batch-ingestion destination.

use bytes::Bytes;

use crate::ContractError;

/// One record the sink refused inside an accepted call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRecord {
    /// Index into the submitted batch
    pub index: usize,
    pub error_code: String,
    pub error_message: String,
}

/// Sink response to one batch submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutBatchResponse {
    /// Records the sink reports as not persisted
    pub failed_put_count: usize,
    /// Per-record details, when the sink provides them
    pub failed_records: Vec<FailedRecord>,
}

impl PutBatchResponse {
    /// Every record accepted
    pub fn accepted() -> Self {
        Self::default()
    }

    pub fn is_partial_failure(&self) -> bool {
        self.failed_put_count > 0
    }
}

/// Batch ingestion sink
///
/// All sink implementations must implement this trait.
#[trait_variant::make(DeliveryStream: Send)]
pub trait LocalDeliveryStream {
    /// Stream name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Submit one batch of opaque records
    ///
    /// `Ok` means the call completed, even if the response reports failed
    /// records.
    ///
    /// # Errors
    /// Returns `ContractError::SinkDelivery` when the call itself cannot complete.
    async fn put_record_batch(
        &mut self,
        records: &[Bytes],
    ) -> Result<PutBatchResponse, ContractError>;
}
