//! Mock catalog client
//!
//! In-memory implementation for unit tests, with injectable failures.

use std::sync::{Arc, Mutex, MutexGuard};

use contracts::ContractError;

use crate::client::CatalogClient;

/// How the mock answers a start request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MockCatalogBehavior {
    /// Start the run
    #[default]
    Start,
    /// Report a run already in progress
    AlreadyRunning,
    /// Fail with the given message
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    behavior: MockCatalogBehavior,
    requests: Vec<String>,
}

/// Mock catalog client
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockCatalogClient {
    state: Arc<Mutex<MockState>>,
}

impl MockCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: MockCatalogBehavior) -> Self {
        let client = Self::default();
        client.lock().behavior = behavior;
        client
    }

    /// Crawler names requested so far
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CatalogClient for MockCatalogClient {
    fn kind(&self) -> &'static str {
        "mock"
    }

    async fn start_crawler(&self, name: &str) -> Result<(), ContractError> {
        let mut state = self.lock();
        state.requests.push(name.to_string());

        match &state.behavior {
            MockCatalogBehavior::Start => Ok(()),
            MockCatalogBehavior::AlreadyRunning => Err(ContractError::CrawlerRunning {
                crawler: name.to_string(),
            }),
            MockCatalogBehavior::Fail(message) => Err(ContractError::catalog(name, message.clone())),
        }
    }
}
