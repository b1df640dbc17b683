//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a mint run.
//! All types derive Serde traits for deserialization from config files.
//! Secrets (mnemonic, API token) are deliberately absent.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct MintConfig {
    /// Node connection settings.
    pub node: NodeConfig,

    /// Sending account.
    pub account: AccountConfig,

    /// Parameters of the asset to create.
    pub asset: AssetConfig,

    /// Confirmation wait bounds.
    pub confirmation: ConfirmationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Algod node configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    /// Base URL of the algod REST API.
    pub address: String,

    /// Header carrying the API token ("X-Algo-API-Token", or "X-API-Key"
    /// for PureStake-style providers).
    pub api_token_header: String,

    /// Timeout for ordinary requests in seconds.
    pub request_timeout_secs: u64,

    /// Timeout for the wait-for-block long-poll in seconds.
    pub long_poll_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost:4001".to_string(),
            api_token_header: "X-Algo-API-Token".to_string(),
            request_timeout_secs: 15,
            // algod answers the long-poll after at most a minute
            long_poll_timeout_secs: 75,
        }
    }
}

/// Account configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AccountConfig {
    /// Sender address. Defaults to the address of the mnemonic's key.
    pub sender: Option<String>,
}

/// Who holds one of the asset's management roles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RoleAddress {
    /// The sending account.
    Sender,
    /// Nobody; the role is permanently disabled.
    Unset,
    /// An explicit account address.
    Account(String),
}

impl From<String> for RoleAddress {
    fn from(s: String) -> Self {
        match s.trim() {
            "sender" => RoleAddress::Sender,
            "" | "none" => RoleAddress::Unset,
            other => RoleAddress::Account(other.to_string()),
        }
    }
}

impl From<RoleAddress> for String {
    fn from(role: RoleAddress) -> Self {
        match role {
            RoleAddress::Sender => "sender".to_string(),
            RoleAddress::Unset => String::new(),
            RoleAddress::Account(address) => address,
        }
    }
}

/// Asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Total number of base units.
    pub total: u64,

    /// Digits after the decimal point when displaying amounts.
    pub decimals: u32,

    /// Whether holdings start frozen.
    pub default_frozen: bool,

    pub manager: RoleAddress,
    pub reserve: RoleAddress,
    pub freeze: RoleAddress,
    pub clawback: RoleAddress,

    pub unit_name: String,
    pub asset_name: String,
    pub url: String,

    /// Hex-encoded 32-byte commitment, empty for none.
    pub metadata_hash: String,

    /// Free-form note attached to the transaction.
    pub note: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            total: 1_000_000,
            decimals: 0,
            default_frozen: false,
            manager: RoleAddress::Sender,
            reserve: RoleAddress::Unset,
            freeze: RoleAddress::Sender,
            clawback: RoleAddress::Sender,
            unit_name: "gullies".to_string(),
            asset_name: "Gullicoin".to_string(),
            url: "github.com/gunnlaugurcalvi".to_string(),
            metadata_hash: String::new(),
            note: String::new(),
        }
    }
}

/// Confirmation wait bounds.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Rounds past submission to wait before giving up.
    pub max_rounds: u64,

    /// Overall wait deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_rounds: 20,
            timeout_secs: 120,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter (trace, debug, info, warn, error, or directives).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: crate::observability::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
