//! Confirmation waiter behaviour against scripted nodes.

use std::time::Duration;

use asa_mint::blockchain::confirmation::{
    wait_for_confirmation, wait_for_confirmation_with, ConfirmationError,
};
use asa_mint::blockchain::types::NodeError;
use asa_mint::config::ConfirmationConfig;

mod common;
use common::MockNode;

const TX_ID: &str = "TXID7QZ2";

fn bounds(max_rounds: u64) -> ConfirmationConfig {
    ConfirmationConfig {
        max_rounds,
        timeout_secs: 30,
    }
}

#[tokio::test]
async fn test_confirms_exactly_on_poll_after_n_misses() {
    let n = 3;
    let node = MockNode::new(100).confirming_on(n + 1);

    let confirmation = wait_for_confirmation(&node, TX_ID, &bounds(20)).await.unwrap();

    let calls = node.calls();
    assert_eq!(calls.status, 1);
    assert_eq!(calls.pending.len(), n + 1, "must stop on poll N+1");
    assert_eq!(calls.waits.len(), n);
    // The reported round is the one the node confirmed on.
    assert_eq!(confirmation.confirmed_round, 103);
    assert_eq!(confirmation.tx_id, TX_ID);
    assert_eq!(confirmation.rounds_waited, 3);
}

#[tokio::test]
async fn test_already_confirmed_needs_no_wait() {
    let node = MockNode::new(100).confirming_on(1);

    let confirmation = wait_for_confirmation(&node, TX_ID, &bounds(20)).await.unwrap();

    assert_eq!(confirmation.confirmed_round, 100);
    assert!(node.calls().waits.is_empty());
}

#[tokio::test]
async fn test_first_status_failure_aborts_before_polling() {
    let mut node = MockNode::new(100).confirming_on(1);
    node.fail_status = true;

    let err = wait_for_confirmation(&node, TX_ID, &bounds(20)).await.unwrap_err();

    assert!(matches!(err, ConfirmationError::Node(NodeError::Http(_))));
    let calls = node.calls();
    assert_eq!(calls.status, 1);
    assert!(calls.pending.is_empty(), "pending info must not be queried");
    assert!(calls.waits.is_empty());
}

#[tokio::test]
async fn test_pending_query_error_is_not_retried() {
    let mut node = MockNode::new(100).confirming_on(5);
    node.fail_later_pending = true;

    let err = wait_for_confirmation(&node, TX_ID, &bounds(20)).await.unwrap_err();

    assert!(matches!(err, ConfirmationError::Node(NodeError::Status { status: 500, .. })));
    let calls = node.calls();
    assert_eq!(calls.pending.len(), 2);
    assert_eq!(calls.waits.len(), 1);
}

#[tokio::test]
async fn test_wait_rounds_strictly_increase() {
    let node = MockNode::new(100).confirming_on(6);

    wait_for_confirmation(&node, TX_ID, &bounds(20)).await.unwrap();

    let waits = node.calls().waits;
    assert_eq!(waits, vec![101, 102, 103, 104, 105]);
    assert!(waits.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_wait_rounds_follow_node_when_it_runs_ahead() {
    let mut node = MockNode::new(100).confirming_on(4);
    node.round_skew = 2;

    let confirmation = wait_for_confirmation(&node, TX_ID, &bounds(20)).await.unwrap();

    // Each answer reports two rounds past the request; the next request
    // starts after what the node reported, not after the local counter.
    let waits = node.calls().waits;
    assert_eq!(waits, vec![101, 104, 107]);
    assert!(waits.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(confirmation.confirmed_round, 109);
}

#[tokio::test]
async fn test_pool_error_rejects() {
    let mut node = MockNode::new(100);
    node.pool_error_on_poll = Some(2);

    let err = wait_for_confirmation(&node, TX_ID, &bounds(20)).await.unwrap_err();

    match err {
        ConfirmationError::Rejected { tx_id, reason } => {
            assert_eq!(tx_id, TX_ID);
            assert_eq!(reason, "overspend");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_round_budget_exhausted() {
    let node = MockNode::new(100);

    let err = wait_for_confirmation(&node, TX_ID, &bounds(3)).await.unwrap_err();

    assert!(matches!(err, ConfirmationError::RoundLimit { rounds: 3, .. }));
    let calls = node.calls();
    assert_eq!(calls.waits, vec![101, 102, 103]);
    assert_eq!(calls.pending.len(), 4);
}

#[tokio::test]
async fn test_deadline_is_a_timeout_not_a_node_error() {
    let mut node = MockNode::new(100);
    node.wait_delay = Some(Duration::from_secs(5));
    let config = ConfirmationConfig {
        max_rounds: 1000,
        timeout_secs: 1,
    };

    let err = wait_for_confirmation(&node, TX_ID, &config).await.unwrap_err();

    assert!(matches!(err, ConfirmationError::Timeout { secs: 1, .. }));
    assert_eq!(err.to_string(), format!("Transaction {} not confirmed within 1 seconds", TX_ID));
}

#[tokio::test]
async fn test_round_at_u64_limit_is_node_error() {
    let node = MockNode::new(u64::MAX);

    let err = wait_for_confirmation(&node, TX_ID, &bounds(5)).await.unwrap_err();

    assert!(matches!(err, ConfirmationError::Node(NodeError::Decode(_))));
    let calls = node.calls();
    assert_eq!(calls.pending.len(), 1);
    assert!(calls.waits.is_empty());
}

#[tokio::test]
async fn test_progress_reported_before_every_wait() {
    let node = MockNode::new(100).confirming_on(4);
    let mut reported = Vec::new();

    wait_for_confirmation_with(&node, TX_ID, &bounds(20), |round| reported.push(round))
        .await
        .unwrap();

    assert_eq!(reported, vec![101, 102, 103]);
    assert_eq!(reported, node.calls().waits);
}
