//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses decode with a valid checksum
//! - Validate value ranges (timeouts > 0, asset field limits)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MintConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::blockchain::address::Address;
use crate::blockchain::transaction::{
    MAX_ASSET_NAME_LEN, MAX_DECIMALS, MAX_UNIT_NAME_LEN, MAX_URL_LEN, METADATA_HASH_LEN,
};
use crate::config::schema::{MintConfig, RoleAddress};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("node.address '{0}' is not a valid URL")]
    NodeAddress(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{field} is not a valid address: {reason}")]
    Address { field: &'static str, reason: String },

    #[error("asset.{field} exceeds {max} bytes")]
    TooLong { field: &'static str, max: usize },

    #[error("asset.decimals must be at most {MAX}", MAX = MAX_DECIMALS)]
    Decimals,

    #[error("asset.metadata_hash must be {len} hex-encoded bytes", len = METADATA_HASH_LEN)]
    MetadataHash,

    #[error("observability.log_level '{0}' is not a valid filter")]
    LogLevel(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &MintConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.node.address.parse::<url::Url>().is_err() {
        errors.push(ValidationError::NodeAddress(config.node.address.clone()));
    }
    if config.node.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("node.request_timeout_secs"));
    }
    if config.node.long_poll_timeout_secs == 0 {
        errors.push(ValidationError::Zero("node.long_poll_timeout_secs"));
    }

    if let Some(sender) = &config.account.sender {
        check_address("account.sender", sender, &mut errors);
    }

    let asset = &config.asset;
    if asset.total == 0 {
        errors.push(ValidationError::Zero("asset.total"));
    }
    if asset.decimals > MAX_DECIMALS {
        errors.push(ValidationError::Decimals);
    }
    for (field, value, max) in [
        ("unit_name", &asset.unit_name, MAX_UNIT_NAME_LEN),
        ("asset_name", &asset.asset_name, MAX_ASSET_NAME_LEN),
        ("url", &asset.url, MAX_URL_LEN),
    ] {
        if value.len() > max {
            errors.push(ValidationError::TooLong { field, max });
        }
    }
    for (field, role) in [
        ("asset.manager", &asset.manager),
        ("asset.reserve", &asset.reserve),
        ("asset.freeze", &asset.freeze),
        ("asset.clawback", &asset.clawback),
    ] {
        if let RoleAddress::Account(address) = role {
            check_address(field, address, &mut errors);
        }
    }
    if !asset.metadata_hash.is_empty() && parse_metadata_hash(&asset.metadata_hash).is_none() {
        errors.push(ValidationError::MetadataHash);
    }

    if config.confirmation.max_rounds == 0 {
        errors.push(ValidationError::Zero("confirmation.max_rounds"));
    }
    if config.confirmation.timeout_secs == 0 {
        errors.push(ValidationError::Zero("confirmation.timeout_secs"));
    }

    if tracing_subscriber::EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Decode a hex metadata hash, `None` unless it is exactly 32 bytes.
pub fn parse_metadata_hash(hex_str: &str) -> Option<[u8; METADATA_HASH_LEN]> {
    hex::decode(hex_str.trim()).ok()?.try_into().ok()
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if let Err(e) = Address::decode(value) {
        errors.push(ValidationError::Address {
            field,
            reason: e.to_string(),
        });
    }
}
