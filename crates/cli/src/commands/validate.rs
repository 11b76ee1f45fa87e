//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{RelayConfig, SinkType};
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    row_sink: String,
    column_sink: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    crawler: Option<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let source = source_name(args);
    info!(source = %source, "Validating configuration");

    let result = match load_config(args.config.as_deref()) {
        Ok(config) => valid_result(source, &config),
        Err(e) => ValidationResult {
            valid: false,
            source,
            error: Some(format!("{e:#}")),
            warnings: None,
            summary: None,
        },
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn source_name(args: &ValidateArgs) -> String {
    args.config
        .as_ref()
        .map_or_else(|| "environment".to_string(), |p| p.display().to_string())
}

fn valid_result(source: String, config: &RelayConfig) -> ValidationResult {
    let warnings = collect_warnings(config);
    ValidationResult {
        valid: true,
        source,
        error: None,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(ConfigSummary {
            version: format!("{:?}", config.version),
            row_sink: format!("{} ({:?})", config.sinks.row.name, config.sinks.row.sink_type),
            column_sink: format!(
                "{} ({:?})",
                config.sinks.column.name, config.sinks.column.sink_type
            ),
            crawler: config.crawler.as_ref().map(|c| c.name.clone()),
        }),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &RelayConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for (role, sink) in config.sinks.ordered() {
        if sink.sink_type == SinkType::Log {
            warnings.push(format!(
                "{role} sink '{}' only logs batches - records are not persisted",
                sink.name
            ));
        }
    }

    if config.crawler.is_none() {
        warnings.push("No crawler configured - the crawl command will fail".to_string());
    }

    if config.normalizer.remove_as_delete {
        warnings.push("normalizer.remove_as_delete is on - REMOVE events are tagged 'D'".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.source);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Row sink: {}", summary.row_sink);
            println!("  Column sink: {}", summary.column_sink);
            println!(
                "  Crawler: {}",
                summary.crawler.as_deref().unwrap_or("(none)")
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.source);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
