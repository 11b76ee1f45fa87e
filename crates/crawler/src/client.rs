//! Catalog client abstraction
//!
//! Supports a real Glue client and a mock client behind one interface.

use std::future::Future;

use contracts::ContractError;

/// Catalog service client
pub trait CatalogClient: Send + Sync {
    /// Client kind (used for logging)
    fn kind(&self) -> &'static str;

    /// Request a crawler run
    ///
    /// # Errors
    /// - `ContractError::CrawlerRunning` if a run is already in progress
    /// - `ContractError::Catalog` for any other failure
    fn start_crawler(&self, name: &str) -> impl Future<Output = Result<(), ContractError>> + Send;
}
