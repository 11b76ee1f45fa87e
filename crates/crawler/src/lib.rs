//! # Crawler
//!
//! Re-scan trigger for the column-store catalog.
//!
//! When new column files land, the configured catalog crawler is started so
//! the new partitions become queryable. A crawler that is already running
//! counts as success.
//!
//! ## Feature Flags
//!
//! - `aws`: Enable the AWS Glue catalog client

pub mod client;
pub mod error;
#[cfg(feature = "aws")]
pub mod glue_client;
pub mod mock_client;
pub mod trigger;

pub use client::CatalogClient;
pub use error::CrawlerError;
#[cfg(feature = "aws")]
pub use glue_client::GlueCatalogClient;
pub use mock_client::{MockCatalogBehavior, MockCatalogClient};
pub use trigger::{CrawlerTrigger, TriggerOutcome};
