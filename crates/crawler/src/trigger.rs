//! CrawlerTrigger - starts the catalog crawler when column files land

use std::fmt;

use contracts::{ContractError, CrawlerConfig, InvocationResult, ObjectLandedEvent};
use tracing::{error, info, instrument};

use crate::client::CatalogClient;
use crate::error::CrawlerError;

/// Result of one trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    AlreadyRunning,
}

impl TriggerOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::AlreadyRunning => "already_running",
        }
    }

    /// Invocation result reported to the caller
    pub fn to_result(self) -> InvocationResult {
        match self {
            Self::Started => InvocationResult::ok("Glue Crawler started successfully"),
            Self::AlreadyRunning => InvocationResult::ok("Glue Crawler already running"),
        }
    }
}

impl fmt::Display for TriggerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Starts one named crawler through a catalog client
pub struct CrawlerTrigger<C> {
    crawler: String,
    client: C,
}

impl<C: CatalogClient> CrawlerTrigger<C> {
    pub fn new(crawler: impl Into<String>, client: C) -> Self {
        Self {
            crawler: crawler.into(),
            client,
        }
    }

    pub fn from_config(config: &CrawlerConfig, client: C) -> Self {
        Self::new(&config.name, client)
    }

    pub fn crawler(&self) -> &str {
        &self.crawler
    }

    /// Handle one object-landed notification
    ///
    /// The notification content is only logged; every notification requests
    /// one crawler run.
    #[instrument(
        name = "crawler_on_objects_landed",
        skip(self, event),
        fields(crawler = %self.crawler, client = self.client.kind(), objects = event.records.len())
    )]
    pub async fn on_objects_landed(
        &self,
        event: &ObjectLandedEvent,
    ) -> Result<TriggerOutcome, CrawlerError> {
        info!(objects = ?event.object_paths(), "Object-landed notification received");

        let outcome = match self.client.start_crawler(&self.crawler).await {
            Ok(()) => {
                info!(crawler = %self.crawler, "Successfully started Glue Crawler");
                TriggerOutcome::Started
            }
            Err(ContractError::CrawlerRunning { .. }) => {
                info!(crawler = %self.crawler, "Glue Crawler is already running, skipping trigger");
                TriggerOutcome::AlreadyRunning
            }
            Err(e) => {
                error!(crawler = %self.crawler, error = %e, "Error starting Glue Crawler");
                observability::record_crawler_trigger(&self.crawler, "failed");
                return Err(CrawlerError::start_failed(&self.crawler, e));
            }
        };

        observability::record_crawler_trigger(&self.crawler, outcome.as_str());
        Ok(outcome)
    }
}

#[cfg(feature = "aws")]
impl CrawlerTrigger<crate::glue_client::GlueCatalogClient> {
    /// Build a Glue-backed trigger from configuration
    pub async fn glue(config: &CrawlerConfig, aws: &contracts::AwsSettings) -> Self {
        let sdk_config = config_loader::aws::load_sdk_config(aws).await;
        let client = crate::glue_client::GlueCatalogClient::from_sdk_config(
            &sdk_config,
            std::time::Duration::from_secs(aws.timeout_secs),
        );
        Self::from_config(config, client)
    }
}
