//! `crawl` command implementation.

use anyhow::{Context, Result};
use config_loader::env;
use contracts::{AwsSettings, CrawlerConfig, ObjectLandedEvent};
use tracing::info;

use super::load_config;
use crate::cli::CrawlArgs;
use crate::input::read_payload;

/// Execute the `crawl` command
pub async fn run_crawl(args: &CrawlArgs) -> Result<()> {
    let (crawler_config, aws) = resolve(args)?;
    let event: ObjectLandedEvent = read_payload(args.input.as_deref())?;

    info!(
        crawler = %crawler_config.name,
        objects = event.records.len(),
        "Triggering catalog crawler"
    );

    trigger(&crawler_config, &aws, &event).await
}

/// Crawler settings from the config file, or from the environment alone
fn resolve(args: &CrawlArgs) -> Result<(CrawlerConfig, AwsSettings)> {
    match args.config.as_deref() {
        Some(path) => {
            let config = load_config(Some(path))?;
            let crawler_config = config.crawler.with_context(|| {
                format!(
                    "No crawler configured in {}; set [crawler] or {}",
                    path.display(),
                    env::ENV_CRAWLER
                )
            })?;
            Ok((crawler_config, config.aws))
        }
        None => {
            let lookup = |key: &str| std::env::var(key).ok();
            let crawler_config = env::crawler_from_lookup(&lookup)
                .context("Failed to load crawler config from environment")?;
            Ok((crawler_config, env::aws_from_lookup(&lookup)))
        }
    }
}

#[cfg(feature = "aws")]
async fn trigger(
    crawler_config: &CrawlerConfig,
    aws: &AwsSettings,
    event: &ObjectLandedEvent,
) -> Result<()> {
    let trigger = crawler::CrawlerTrigger::glue(crawler_config, aws).await;
    let outcome = trigger.on_objects_landed(event).await?;
    println!(
        "{}",
        serde_json::to_string(&outcome.to_result()).context("Failed to serialize result")?
    );
    Ok(())
}

#[cfg(not(feature = "aws"))]
async fn trigger(
    crawler_config: &CrawlerConfig,
    _aws: &AwsSettings,
    _event: &ObjectLandedEvent,
) -> Result<()> {
    anyhow::bail!(
        "cannot start crawler '{}': built without the `aws` feature",
        crawler_config.name
    )
}
