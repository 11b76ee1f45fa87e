//! Crawler error types

use contracts::ContractError;
use thiserror::Error;

/// Crawler trigger errors
#[derive(Debug, Error)]
pub enum CrawlerError {
    /// The start request failed for a reason other than an active run
    #[error("failed to start crawler '{crawler}': {source}")]
    StartFailed {
        crawler: String,
        #[source]
        source: ContractError,
    },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl CrawlerError {
    /// Create a start failure
    pub fn start_failed(crawler: impl Into<String>, source: ContractError) -> Self {
        Self::StartFailed {
            crawler: crawler.into(),
            source,
        }
    }
}
