//! AWS Glue catalog client

use std::time::Duration;

use aws_sdk_glue::config::timeout::TimeoutConfig;
use aws_sdk_glue::error::{DisplayErrorContext, SdkError};
use aws_sdk_glue::operation::start_crawler::StartCrawlerError;
use aws_sdk_glue::Client;
use config_loader::aws::SdkConfig;
use contracts::ContractError;
use tracing::{debug, instrument};

use crate::client::CatalogClient;

/// Glue-backed catalog client
pub struct GlueCatalogClient {
    client: Client,
}

impl GlueCatalogClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from shared SDK configuration
    pub fn from_sdk_config(sdk_config: &SdkConfig, timeout: Duration) -> Self {
        let glue_config = aws_sdk_glue::config::Builder::from(sdk_config)
            .timeout_config(TimeoutConfig::builder().operation_timeout(timeout).build())
            .build();
        Self::new(Client::from_conf(glue_config))
    }
}

fn map_start_error(crawler: &str, err: SdkError<StartCrawlerError>) -> ContractError {
    let running = err
        .as_service_error()
        .is_some_and(StartCrawlerError::is_crawler_running_exception);
    if running {
        ContractError::CrawlerRunning {
            crawler: crawler.to_string(),
        }
    } else {
        ContractError::catalog(crawler, DisplayErrorContext(&err).to_string())
    }
}

impl CatalogClient for GlueCatalogClient {
    fn kind(&self) -> &'static str {
        "glue"
    }

    #[instrument(name = "glue_start_crawler", skip(self))]
    async fn start_crawler(&self, name: &str) -> Result<(), ContractError> {
        self.client
            .start_crawler()
            .name(name)
            .send()
            .await
            .map_err(|e| map_start_error(name, e))?;
        debug!(crawler = name, "StartCrawler accepted");
        Ok(())
    }
}
