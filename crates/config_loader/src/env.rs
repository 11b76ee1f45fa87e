//! Environment-driven configuration
//!
//! Serverless deployments carry no config file; stream and crawler names come
//! from the environment.

use contracts::{
    AwsSettings, ConfigVersion, ContractError, CrawlerConfig, NormalizerConfig, RelayConfig,
    SinkConfig, SinkRoutes,
};

/// Row-store delivery stream name
pub const ENV_ROW_STREAM: &str = "FIREHOSE_DELIVERY_STREAM_JSON_NAME";
/// Column-store delivery stream name
pub const ENV_COLUMN_STREAM: &str = "FIREHOSE_DELIVERY_STREAM_PARQUET_NAME";
/// Catalog crawler name
pub const ENV_CRAWLER: &str = "USER_PARQUET_GLUE_CRAWLER_NAME";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

/// Build a config from environment values only
///
/// Both stream names are required. Empty values count as unset.
pub fn from_lookup<F>(lookup: F) -> Result<RelayConfig, ContractError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| non_empty(&lookup, key);
    let require = |key: &str| {
        get(key).ok_or_else(|| {
            ContractError::config_validation(key, "required environment variable is not set")
        })
    };

    Ok(RelayConfig {
        version: ConfigVersion::V1,
        aws: aws_from_lookup(&lookup),
        normalizer: NormalizerConfig::default(),
        sinks: SinkRoutes {
            row: SinkConfig::firehose(require(ENV_ROW_STREAM)?),
            column: SinkConfig::firehose(require(ENV_COLUMN_STREAM)?),
        },
        crawler: get(ENV_CRAWLER).map(|name| CrawlerConfig { name }),
    })
}

/// AWS client settings from environment values
pub fn aws_from_lookup<F>(lookup: &F) -> AwsSettings
where
    F: Fn(&str) -> Option<String>,
{
    AwsSettings {
        region: non_empty(lookup, ENV_REGION),
        endpoint_url: non_empty(lookup, ENV_ENDPOINT_URL),
        ..AwsSettings::default()
    }
}

/// Crawler configuration from environment values
///
/// The crawler trigger runs without delivery streams, so only the crawler
/// name is required here.
pub fn crawler_from_lookup<F>(lookup: &F) -> Result<CrawlerConfig, ContractError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, ENV_CRAWLER)
        .map(|name| CrawlerConfig { name })
        .ok_or_else(|| {
            ContractError::config_validation(ENV_CRAWLER, "required environment variable is not set")
        })
}

/// Overlay environment values on a file-based config
///
/// Set variables replace the matching fields; unset ones leave them alone.
pub fn apply_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = non_empty(&lookup, ENV_ROW_STREAM) {
        config.sinks.row.name = name;
    }
    if let Some(name) = non_empty(&lookup, ENV_COLUMN_STREAM) {
        config.sinks.column.name = name;
    }
    if let Some(name) = non_empty(&lookup, ENV_CRAWLER) {
        config.crawler = Some(CrawlerConfig { name });
    }
    if let Some(region) = non_empty(&lookup, ENV_REGION) {
        config.aws.region = Some(region);
    }
    if let Some(url) = non_empty(&lookup, ENV_ENDPOINT_URL) {
        config.aws.endpoint_url = Some(url);
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}
