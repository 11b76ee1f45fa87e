//! Config validation
//!
//! Field-level rules come from the `Validate` derive on the contract types.
//! Cross-field rules:
//! - row and column sinks are distinct destinations
//! - file sinks name a `base_path`
//! - crawler name, when present, is not empty
//! - endpoint override is an http(s) URL

use contracts::{ContractError, RelayConfig, SinkType};
use validator::Validate;

/// Validate a RelayConfig
///
/// Returns the first error found, or Ok(()).
pub fn validate(config: &RelayConfig) -> Result<(), ContractError> {
    validate_fields(config)?;
    validate_distinct_sinks(config)?;
    validate_file_sinks(config)?;
    validate_crawler(config)?;
    validate_endpoint(config)?;
    Ok(())
}

fn validate_fields(config: &RelayConfig) -> Result<(), ContractError> {
    config
        .validate()
        .map_err(|e| ContractError::config_validation("config", e.to_string()))
}

fn validate_distinct_sinks(config: &RelayConfig) -> Result<(), ContractError> {
    let routes = &config.sinks;
    if routes.row.sink_type == routes.column.sink_type && routes.row.name == routes.column.name {
        return Err(ContractError::config_validation(
            "sinks.column.name",
            format!(
                "row and column sinks must be distinct destinations, both are '{}'",
                routes.row.name
            ),
        ));
    }
    Ok(())
}

fn validate_file_sinks(config: &RelayConfig) -> Result<(), ContractError> {
    for (role, sink) in config.sinks.ordered() {
        if sink.sink_type != SinkType::File {
            continue;
        }
        let has_path = sink
            .params
            .get("base_path")
            .is_some_and(|path| !path.trim().is_empty());
        if !has_path {
            return Err(ContractError::config_validation(
                format!("sinks.{}.params.base_path", role_key(role)),
                "file sink requires a base_path",
            ));
        }
    }
    Ok(())
}

fn validate_crawler(config: &RelayConfig) -> Result<(), ContractError> {
    if let Some(crawler) = &config.crawler {
        if crawler.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                "crawler.name",
                "crawler name cannot be empty",
            ));
        }
    }
    Ok(())
}

fn validate_endpoint(config: &RelayConfig) -> Result<(), ContractError> {
    if let Some(url) = &config.aws.endpoint_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ContractError::config_validation(
                "aws.endpoint_url",
                format!("endpoint_url must be an http(s) URL, got '{url}'"),
            ));
        }
    }
    Ok(())
}

fn role_key(role: contracts::SinkRole) -> &'static str {
    match role {
        contracts::SinkRole::Row => "row",
        contracts::SinkRole::Column => "column",
    }
}
