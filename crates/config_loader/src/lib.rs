//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Build configuration from environment variables
//! - Validate configuration legality
//! - Generate `RelayConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("relay.toml")).unwrap();
//! println!("Row stream: {}", config.sinks.row.name);
//! ```

#[cfg(feature = "aws")]
pub mod aws;
pub mod env;
mod parser;
mod validator;

pub use contracts::RelayConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files, strings or the
/// process environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    /// Environment overrides are not applied; see [`ConfigLoader::load_layered`].
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<RelayConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<RelayConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Build configuration from process environment only
    ///
    /// # Errors
    /// A delivery stream name is unset, or validation fails.
    pub fn from_env() -> Result<RelayConfig, ContractError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Build configuration from an injected environment lookup
    pub fn from_env_with<F>(lookup: F) -> Result<RelayConfig, ContractError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = env::from_lookup(lookup)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Load a file if given, otherwise the environment, then apply overrides
    pub fn load_layered<F>(path: Option<&Path>, lookup: F) -> Result<RelayConfig, ContractError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(path) = path else {
            return Self::from_env_with(lookup);
        };

        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        let mut config = parser::parse(&content, format)?;
        env::apply_overrides(&mut config, lookup);
        validator::validate(&config)?;
        Ok(config)
    }

    /// Serialize RelayConfig to TOML string
    pub fn to_toml(config: &RelayConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize RelayConfig to JSON string
    pub fn to_json(config: &RelayConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<RelayConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}
