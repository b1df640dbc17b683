//! Node response types and error definitions.

use thiserror::Error;

// Re-export NodeConfig from config module to avoid duplication
pub use crate::config::schema::NodeConfig;

/// Number of rounds a transaction stays valid after its first valid round.
pub const DEFAULT_VALIDITY_WINDOW: u64 = 1000;

/// Errors that can occur while talking to an algod node.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Transport-level failure (connection refused, TLS, reset).
    #[error("HTTP error: {0}")]
    Http(String),

    /// A single request exceeded its deadline.
    #[error("Node request timed out after {0} seconds")]
    Timeout(u64),

    /// The node answered with a non-success status.
    #[error("Node returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Failed to decode node response: {0}")]
    Decode(String),

    /// Node address is not a valid URL.
    #[error("Invalid node URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;

/// Subset of `GET /v2/status` used by this crate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct NodeStatus {
    #[serde(rename = "last-round")]
    pub last_round: u64,

    #[serde(rename = "time-since-last-round", default)]
    pub time_since_last_round: u64,

    #[serde(rename = "catchup-time", default)]
    pub catchup_time: u64,
}

/// Subset of `GET /v2/transactions/pending/{txid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct PendingTransaction {
    /// Round the transaction was confirmed in, 0 while still pending.
    #[serde(rename = "confirmed-round")]
    pub confirmed_round: u64,

    /// Non-empty when the node dropped the transaction from its pool.
    #[serde(rename = "pool-error")]
    pub pool_error: String,

    /// Index of the asset created by this transaction, if any.
    #[serde(rename = "asset-index")]
    pub asset_index: Option<u64>,
}

impl PendingTransaction {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_round > 0
    }
}

/// Network parameters a new transaction is built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedParams {
    /// Fee per byte in microAlgos.
    pub fee_per_byte: u64,
    /// Minimum flat fee in microAlgos.
    pub min_fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
}

/// Raw `GET /v2/transactions/params` body.
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct TransactionParamsResponse {
    pub fee: u64,
    #[serde(rename = "min-fee")]
    pub min_fee: u64,
    #[serde(rename = "last-round")]
    pub last_round: u64,
    #[serde(rename = "genesis-id")]
    pub genesis_id: String,
    #[serde(rename = "genesis-hash")]
    pub genesis_hash: String,
}

impl TryFrom<TransactionParamsResponse> for SuggestedParams {
    type Error = NodeError;

    fn try_from(raw: TransactionParamsResponse) -> NodeResult<Self> {
        use base64::Engine;

        let hash = base64::engine::general_purpose::STANDARD
            .decode(&raw.genesis_hash)
            .map_err(|e| NodeError::Decode(format!("genesis hash: {}", e)))?;
        let genesis_hash: [u8; 32] = hash.try_into().map_err(|v: Vec<u8>| {
            NodeError::Decode(format!("genesis hash must be 32 bytes, got {}", v.len()))
        })?;

        let last_valid = raw
            .last_round
            .checked_add(DEFAULT_VALIDITY_WINDOW)
            .ok_or_else(|| NodeError::Decode(format!("last-round {} out of range", raw.last_round)))?;

        Ok(Self {
            fee_per_byte: raw.fee,
            min_fee: raw.min_fee,
            first_valid: raw.last_round,
            last_valid,
            genesis_id: raw.genesis_id,
            genesis_hash,
        })
    }
}

/// `POST /v2/transactions` response.
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(rename = "txId")]
    pub tx_id: String,
}

/// Error body returned by algod on non-2xx responses.
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct NodeErrorBody {
    pub message: String,
}
