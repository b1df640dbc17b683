//! Mint flow types.

use thiserror::Error;

use crate::blockchain::confirmation::{Confirmation, ConfirmationError};
use crate::blockchain::transaction::TransactionError;
use crate::blockchain::types::NodeError;
use crate::blockchain::wallet::WalletError;
use crate::config::ConfigError;

/// Any failure along the mint flow.
#[derive(Debug, Error)]
pub enum MintError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Confirmation error: {0}")]
    Confirmation(#[from] ConfirmationError),

    /// The node acknowledged a different id than the one signed.
    #[error("Node returned transaction id {returned}, expected {signed}")]
    TxIdMismatch { signed: String, returned: String },
}

/// Result type for the mint flow.
pub type MintResult<T> = Result<T, MintError>;

/// Progress notifications, in the order they occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintEvent {
    /// Suggested parameters fetched from the node.
    ParamsFetched { first_valid: u64, last_valid: u64 },
    /// Transaction built and signed.
    Signed { tx_id: String, fee: u64 },
    /// Node accepted the transaction into its pool.
    Submitted { tx_id: String },
    /// About to wait for `round`; sent once per round waited.
    WaitingForConfirmation { tx_id: String, round: u64 },
}

/// Result of a mint run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub tx_id: String,
    /// `None` for dry runs, which stop before submission.
    pub confirmation: Option<Confirmation>,
}

impl MintOutcome {
    /// Index of the created asset, if the node reported it.
    pub fn asset_index(&self) -> Option<u64> {
        self.confirmation.as_ref().and_then(|c| c.asset_index)
    }
}
