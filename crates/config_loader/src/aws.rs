//! Shared AWS SDK configuration

use aws_config::{BehaviorVersion, Region};
use contracts::AwsSettings;
use tracing::debug;

pub use aws_config::SdkConfig;

/// Resolve SDK configuration once for every client in the process
///
/// Region and endpoint fall back to the SDK's default provider chain when
/// not set.
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &settings.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    debug!(
        region = ?sdk_config.region().map(|r| r.as_ref()),
        endpoint = ?settings.endpoint_url,
        "AWS SDK config loaded"
    );
    sdk_config
}
