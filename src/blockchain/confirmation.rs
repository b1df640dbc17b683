//! Waiting for a submitted transaction to be confirmed.
//!
//! # Algorithm
//! ```text
//! status()                          → last_round
//! loop:
//!     pending_transaction(tx_id)    → confirmed? done : rejected? fail
//!     status_after_block(last + 1)  → last_round = max(requested, reported)
//! ```
//!
//! A round at the top of the `u64` range cannot be waited past and is
//! reported as a node decode error.
//!
//! Node errors abort the wait immediately; nothing is retried. The loop is
//! bounded by a round budget and an overall deadline, both reported as
//! timeouts distinct from node failures.

use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use crate::blockchain::node::NodeApi;
use crate::blockchain::types::NodeError;
pub use crate::config::schema::ConfirmationConfig;

/// Errors that end a confirmation wait.
#[derive(Debug, Error)]
pub enum ConfirmationError {
    /// A node query failed.
    #[error(transparent)]
    Node(#[from] NodeError),

    /// The node dropped the transaction from its pool.
    #[error("Transaction {tx_id} rejected: {reason}")]
    Rejected { tx_id: String, reason: String },

    /// The transaction was not confirmed within the round budget.
    #[error("Transaction {tx_id} not confirmed after {rounds} rounds")]
    RoundLimit { tx_id: String, rounds: u64 },

    /// The overall wait deadline passed.
    #[error("Transaction {tx_id} not confirmed within {secs} seconds")]
    Timeout { tx_id: String, secs: u64 },
}

/// Result type for confirmation waits.
pub type ConfirmationResult<T> = Result<T, ConfirmationError>;

/// Progress of a single wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationState {
    pub tx_id: String,
    /// Round the wait started at.
    pub start_round: u64,
    /// Last round known to exist on the node; never decreases.
    pub last_round: u64,
    /// Set once the node reports a confirmed round.
    pub confirmed_round: Option<u64>,
}

impl ConfirmationState {
    pub fn new(tx_id: impl Into<String>, start_round: u64) -> Self {
        Self {
            tx_id: tx_id.into(),
            start_round,
            last_round: start_round,
            confirmed_round: None,
        }
    }

    /// Next round to long-poll for, `None` once the round counter is exhausted.
    pub fn next_round(&self) -> Option<u64> {
        self.last_round.checked_add(1)
    }

    /// Record the node's answer to a long-poll for `requested`.
    pub fn observe_round(&mut self, requested: u64, reported: u64) {
        self.last_round = self.last_round.max(requested).max(reported);
    }

    pub fn rounds_waited(&self) -> u64 {
        self.last_round - self.start_round
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_round.is_some()
    }

    fn into_confirmation(self, asset_index: Option<u64>) -> Confirmation {
        Confirmation {
            rounds_waited: self.rounds_waited(),
            confirmed_round: self.confirmed_round.unwrap_or_default(),
            asset_index,
            tx_id: self.tx_id,
        }
    }
}

/// A confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_id: String,
    pub confirmed_round: u64,
    /// Asset created by the transaction, when the node reports one.
    pub asset_index: Option<u64>,
    pub rounds_waited: u64,
}

/// Wait until `tx_id` is confirmed.
///
/// # Arguments
/// * `node` - Node query capability
/// * `tx_id` - Id returned by the node on submission
/// * `config` - Round budget and overall deadline
pub async fn wait_for_confirmation<N>(
    node: &N,
    tx_id: &str,
    config: &ConfirmationConfig,
) -> ConfirmationResult<Confirmation>
where
    N: NodeApi + ?Sized,
{
    wait_for_confirmation_with(node, tx_id, config, |_| {}).await
}

/// Like [`wait_for_confirmation`], calling `on_wait` with the requested
/// round before each long-poll.
pub async fn wait_for_confirmation_with<N, F>(
    node: &N,
    tx_id: &str,
    config: &ConfirmationConfig,
    mut on_wait: F,
) -> ConfirmationResult<Confirmation>
where
    N: NodeApi + ?Sized,
    F: FnMut(u64),
{
    let deadline = Duration::from_secs(config.timeout_secs);
    let polling = poll_until_confirmed(node, tx_id, config.max_rounds, &mut on_wait);

    match timeout(deadline, polling).await {
        Ok(result) => result,
        Err(_) => Err(ConfirmationError::Timeout {
            tx_id: tx_id.to_string(),
            secs: config.timeout_secs,
        }),
    }
}

async fn poll_until_confirmed<N, F>(
    node: &N,
    tx_id: &str,
    max_rounds: u64,
    on_wait: &mut F,
) -> ConfirmationResult<Confirmation>
where
    N: NodeApi + ?Sized,
    F: FnMut(u64),
{
    let status = node.status().await?;
    let mut state = ConfirmationState::new(tx_id, status.last_round);

    loop {
        let pending = node.pending_transaction(tx_id).await?;

        if pending.is_confirmed() {
            tracing::info!(
                tx_id = %tx_id,
                round = pending.confirmed_round,
                rounds_waited = state.rounds_waited(),
                "Transaction confirmed"
            );
            state.confirmed_round = Some(pending.confirmed_round);
            return Ok(state.into_confirmation(pending.asset_index));
        }

        if !pending.pool_error.is_empty() {
            return Err(ConfirmationError::Rejected {
                tx_id: tx_id.to_string(),
                reason: pending.pool_error,
            });
        }

        if state.rounds_waited() >= max_rounds {
            return Err(ConfirmationError::RoundLimit {
                tx_id: tx_id.to_string(),
                rounds: state.rounds_waited(),
            });
        }

        let requested = state.next_round().ok_or_else(|| {
            NodeError::Decode(format!("round {} out of range", state.last_round))
        })?;
        tracing::debug!(tx_id = %tx_id, round = requested, "Waiting for confirmation");
        on_wait(requested);
        let status = node.status_after_block(requested).await?;
        state.observe_round(requested, status.last_round);
    }
}
