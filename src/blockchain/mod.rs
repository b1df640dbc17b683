//! Algorand integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (mnemonic, API token)
//!     → wallet.rs (mnemonic.rs key recovery, signing)
//!     → client.rs (algod REST with timeouts, implements node.rs)
//!     → transaction.rs (build, encode, id)
//!     → confirmation.rs (wait for the transaction's round)
//! ```
//!
//! # Security Constraints
//! - Mnemonic and API token ONLY from environment variables
//! - Never log keys, mnemonics or tokens
//! - All node calls have configurable timeouts

pub mod address;
pub mod client;
pub mod confirmation;
pub mod mnemonic;
pub mod node;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use address::Address;
pub use client::AlgodClient;
pub use confirmation::{
    wait_for_confirmation, wait_for_confirmation_with, Confirmation, ConfirmationError,
    ConfirmationState,
};
pub use node::NodeApi;
pub use transaction::{
    make_asset_create_txn, make_asset_create_txn_with_signer, AssetParams, SignedTransaction,
    Transaction,
};
pub use types::{NodeConfig, NodeError, NodeStatus, PendingTransaction, SuggestedParams};
pub use wallet::{TransactionSigner, Wallet, WalletError};
