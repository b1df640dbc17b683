//! Node query capability.
//!
//! The confirmation waiter and the mint flow only see this trait, so tests
//! can drive them with scripted nodes.

use async_trait::async_trait;

use crate::blockchain::types::{NodeResult, NodeStatus, PendingTransaction, SuggestedParams};

#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Current node status.
    async fn status(&self) -> NodeResult<NodeStatus>;

    /// Pool or ledger status of a submitted transaction.
    async fn pending_transaction(&self, tx_id: &str) -> NodeResult<PendingTransaction>;

    /// Block until a round after `round` exists, then return node status.
    async fn status_after_block(&self, round: u64) -> NodeResult<NodeStatus>;

    /// Network parameters for building a new transaction.
    async fn suggested_params(&self) -> NodeResult<SuggestedParams>;

    /// Broadcast a signed transaction, returning its id.
    async fn send_raw_transaction(&self, signed: &[u8]) -> NodeResult<String>;
}
