//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::MintConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `node.address`.
pub const NODE_ADDRESS_ENV_VAR: &str = "ASA_MINT_NODE_ADDRESS";
/// Environment variable overriding `account.sender`.
pub const SENDER_ENV_VAR: &str = "ASA_MINT_SENDER";
/// Environment variable overriding `observability.log_level`.
pub const LOG_LEVEL_ENV_VAR: &str = "ASA_MINT_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MintConfig, ConfigError> {
    let config = read_file(path)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read_file(path: &Path) -> Result<MintConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build the effective configuration: file (or defaults), then
/// environment overrides, then validation.
pub fn load(path: Option<&Path>) -> Result<MintConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => MintConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        node = %config.node.address,
        from_file = path.is_some(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut MintConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(address) = lookup(NODE_ADDRESS_ENV_VAR).filter(|v| !v.is_empty()) {
        config.node.address = address;
    }
    if let Some(sender) = lookup(SENDER_ENV_VAR).filter(|v| !v.is_empty()) {
        config.account.sender = Some(sender);
    }
    if let Some(level) = lookup(LOG_LEVEL_ENV_VAR).filter(|v| !v.is_empty()) {
        config.observability.log_level = level;
    }
}
