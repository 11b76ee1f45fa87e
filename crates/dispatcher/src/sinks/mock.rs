//! MockDeliveryStream - in-memory sink for tests
//!
//! Records every submitted batch and can inject partial or call-level
//! failures.

use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use contracts::{ContractError, DeliveryStream, FailedRecord, PutBatchResponse};

/// How the mock answers a submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MockBehavior {
    /// Accept every record
    #[default]
    Accept,
    /// Report the last `n` records of each batch as failed
    PartialFailure(usize),
    /// Fail the call itself with the given message
    CallFailure(String),
}

/// Submission order shared between several mocks
pub type CallJournal = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Default)]
struct MockState {
    behavior: MockBehavior,
    calls: Vec<Vec<Bytes>>,
}

/// In-memory delivery stream
///
/// Clones share state, so a test can keep one clone and hand the other to
/// the dispatcher.
#[derive(Debug, Clone)]
pub struct MockDeliveryStream {
    name: String,
    state: Arc<Mutex<MockState>>,
    journal: Option<CallJournal>,
}

impl MockDeliveryStream {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_behavior(name, MockBehavior::Accept)
    }

    pub fn with_behavior(name: impl Into<String>, behavior: MockBehavior) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockState {
                behavior,
                calls: Vec::new(),
            })),
            journal: None,
        }
    }

    /// Append this stream's name to `journal` on every call
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Change behavior for subsequent calls
    pub fn set_behavior(&self, behavior: MockBehavior) {
        self.lock().behavior = behavior;
    }

    /// Every batch received, in call order
    pub fn calls(&self) -> Vec<Vec<Bytes>> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// All records received across calls
    pub fn records(&self) -> Vec<Bytes> {
        self.lock().calls.iter().flatten().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DeliveryStream for MockDeliveryStream {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put_record_batch(
        &mut self,
        records: &[Bytes],
    ) -> Result<PutBatchResponse, ContractError> {
        if let Some(journal) = &self.journal {
            journal
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(self.name.clone());
        }

        let mut state = self.lock();
        state.calls.push(records.to_vec());

        match &state.behavior {
            MockBehavior::Accept => Ok(PutBatchResponse::accepted()),
            MockBehavior::PartialFailure(n) => {
                let failed = (*n).min(records.len());
                let failed_records = (records.len() - failed..records.len())
                    .map(|index| FailedRecord {
                        index,
                        error_code: "ServiceUnavailableException".to_string(),
                        error_message: "Slow down.".to_string(),
                    })
                    .collect();
                Ok(PutBatchResponse {
                    failed_put_count: failed,
                    failed_records,
                })
            }
            MockBehavior::CallFailure(message) => {
                Err(ContractError::sink_delivery(&self.name, message.clone()))
            }
        }
    }
}
