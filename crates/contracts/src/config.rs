//! RelayConfig - Config Loader output
//!
//! Describes the two delivery routes, AWS client settings, normalizer options
//! and the optional crawler to trigger.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use validator::Validate;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete relay configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RelayConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// AWS client settings shared by every remote client
    #[serde(default)]
    #[validate(nested)]
    pub aws: AwsSettings,

    /// Record normalization options
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Delivery routes
    #[validate(nested)]
    pub sinks: SinkRoutes,

    /// Catalog crawler to re-scan after column files land
    #[serde(default)]
    pub crawler: Option<CrawlerConfig>,
}

/// AWS client settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AwsSettings {
    /// Region override (defaults to the SDK provider chain)
    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override (e.g. a local emulator)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Per-operation timeout
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, message = "timeout_secs must be >= 1"))]
    pub timeout_secs: u64,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            region: None,
            endpoint_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Normalizer options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Tag REMOVE events as `D` instead of `U`
    ///
    /// Off by default: downstream tables have always received `U` for
    /// removals.
    #[serde(default)]
    pub remove_as_delete: bool,
}

/// Row-store and column-store delivery routes
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SinkRoutes {
    /// Row-oriented destination (JSON)
    #[validate(nested)]
    pub row: SinkConfig,

    /// Column-oriented destination (Parquet)
    #[validate(nested)]
    pub column: SinkConfig,
}

impl SinkRoutes {
    /// Routes in submission order
    pub fn ordered(&self) -> [(SinkRole, &SinkConfig); 2] {
        [(SinkRole::Row, &self.row), (SinkRole::Column, &self.column)]
    }
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SinkConfig {
    /// Delivery stream name
    #[validate(length(min = 1, message = "sink name cannot be empty"))]
    pub name: String,

    /// Sink type
    #[serde(default)]
    pub sink_type: SinkType,

    /// Type specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl SinkConfig {
    /// Firehose stream with the given name
    pub fn firehose(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sink_type: SinkType::Firehose,
            params: HashMap::new(),
        }
    }
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Kinesis Data Firehose delivery stream
    #[default]
    Firehose,
    /// Append JSON lines to a local file
    File,
    /// Log batch summaries only
    Log,
}

/// Which destination a sink feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkRole {
    Row,
    Column,
}

impl SinkRole {
    /// Label used in diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Row => "JSON",
            Self::Column => "PARQUET",
        }
    }
}

impl fmt::Display for SinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog crawler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Crawler name
    pub name: String,
}
