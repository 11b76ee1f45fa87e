//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::RelayConfig;
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    aws: AwsInfo,
    remove_as_delete: bool,
    sinks: Vec<SinkInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crawler: Option<String>,
}

#[derive(Serialize)]
struct AwsInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint_url: Option<String>,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct SinkInfo {
    role: String,
    name: String,
    sink_type: String,
    #[serde(skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    params: std::collections::BTreeMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = ?args.config, "Loading configuration info");

    let config = load_config(args.config.as_deref())?;
    let info = build_config_info(&config);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(config: &RelayConfig) -> ConfigInfo {
    let sinks = config
        .sinks
        .ordered()
        .into_iter()
        .map(|(role, sink)| SinkInfo {
            role: role.to_string(),
            name: sink.name.clone(),
            sink_type: format!("{:?}", sink.sink_type),
            params: sink
                .params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", config.version),
        aws: AwsInfo {
            region: config.aws.region.clone(),
            endpoint_url: config.aws.endpoint_url.clone(),
            timeout_secs: config.aws.timeout_secs,
        },
        remove_as_delete: config.normalizer.remove_as_delete,
        sinks,
        crawler: config.crawler.as_ref().map(|c| c.name.clone()),
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("=== CDC Relay Configuration ===\n");

    println!("Version: {}", info.version);

    println!("\nAWS");
    println!(
        "   ├─ Region: {}",
        info.aws.region.as_deref().unwrap_or("(provider chain)")
    );
    println!(
        "   ├─ Endpoint: {}",
        info.aws.endpoint_url.as_deref().unwrap_or("(default)")
    );
    println!("   └─ Timeout: {}s", info.aws.timeout_secs);

    println!("\nNormalizer");
    println!(
        "   └─ REMOVE tagged as: {}",
        if info.remove_as_delete { "D" } else { "U" }
    );

    println!("\nSinks ({})", info.sinks.len());
    for (i, sink) in info.sinks.iter().enumerate() {
        let prefix = if i == info.sinks.len() - 1 { "└─" } else { "├─" };
        println!("   {} {}: {} ({})", prefix, sink.role, sink.name, sink.sink_type);
    }

    println!(
        "\nCrawler: {}",
        info.crawler.as_deref().unwrap_or("(none)")
    );
    println!();
}
