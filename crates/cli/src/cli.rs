//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CDC Relay - DynamoDB stream to Firehose change relay
#[derive(Parser, Debug)]
#[command(
    name = "cdc-relay",
    author,
    version,
    about = "DynamoDB stream to Firehose change-data-capture relay",
    long_about = "Normalizes DynamoDB stream batches into envelope records and delivers\n\
                  them to a row-store (JSON) and a column-store (Parquet) Firehose stream.\n\n\
                  Configuration comes from a TOML/JSON file or, when no file is given,\n\
                  from FIREHOSE_DELIVERY_STREAM_JSON_NAME / FIREHOSE_DELIVERY_STREAM_PARQUET_NAME."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "CDC_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "json",
        global = true,
        env = "CDC_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize change batches and deliver them to both sinks
    Process(ProcessArgs),

    /// Start the catalog crawler for an object-landed notification
    Crawl(CrawlArgs),

    /// Validate configuration without processing anything
    Validate(ValidateArgs),

    /// Display resolved configuration
    Info(InfoArgs),
}

/// Arguments for the `process` command
#[derive(Parser, Debug, Clone)]
pub struct ProcessArgs {
    /// Configuration file (TOML or JSON); environment only when omitted
    #[arg(short, long, env = "CDC_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Stream batch files, one invocation each ("-" or none reads stdin)
    pub inputs: Vec<PathBuf>,

    /// Deliver to JSON-lines files under this directory instead of the configured sinks
    #[arg(long, env = "CDC_RELAY_LOCAL_DIR")]
    pub local_dir: Option<PathBuf>,

    /// Normalize and print records without delivering them
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "CDC_RELAY_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `crawl` command
#[derive(Parser, Debug, Clone)]
pub struct CrawlArgs {
    /// Configuration file (TOML or JSON); environment only when omitted
    #[arg(short, long, env = "CDC_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Object-landed notification file ("-" or none reads stdin)
    pub input: Option<PathBuf>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Configuration file to validate; environment only when omitted
    #[arg(short, long, env = "CDC_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Configuration file; environment only when omitted
    #[arg(short, long, env = "CDC_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    #[default]
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
