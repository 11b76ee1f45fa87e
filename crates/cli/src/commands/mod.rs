//! Command implementations.

mod crawl;
mod info;
mod process;
mod validate;

pub use crawl::run_crawl;
pub use info::run_info;
pub use process::run_process;
pub use validate::run_validate;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::RelayConfig;
use std::path::Path;

/// Resolve configuration from an optional file plus process environment
pub(crate) fn load_config(path: Option<&Path>) -> Result<RelayConfig> {
    let source = path.map_or_else(|| "environment".to_string(), |p| p.display().to_string());
    ConfigLoader::load_layered(path, |key| std::env::var(key).ok())
        .with_context(|| format!("Failed to load config from {source}"))
}
