//! Asset minting.
//!
//! # Data Flow
//! ```text
//! MintConfig.asset ─▶ resolve_asset_params ─┐
//! node.suggested_params() ──────────────────┴▶ make_asset_create_txn
//!     → signer.sign_transaction
//!     → node.send_raw_transaction
//!     → wait_for_confirmation
//! ```

pub mod flow;
pub mod types;

pub use flow::{resolve_asset_params, Minter};
pub use types::{MintError, MintEvent, MintOutcome, MintResult};
