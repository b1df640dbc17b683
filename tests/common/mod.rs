//! Shared mocks for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha512_256};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use asa_mint::blockchain::transaction::{SignedTransaction, Transaction};
use asa_mint::blockchain::types::{
    NodeError, NodeResult, NodeStatus, PendingTransaction, SuggestedParams,
};
use asa_mint::blockchain::wallet::{TransactionSigner, WalletResult};
use asa_mint::blockchain::{Address, NodeApi};

/// Prefix of payloads produced by [`MockSigner`].
pub const MOCK_SIGNED_PREFIX: &[u8] = b"SIGNED:";

/// Everything a [`MockNode`] was asked.
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub status: usize,
    pub pending: Vec<String>,
    pub waits: Vec<u64>,
    pub params: usize,
    pub submitted: Vec<Vec<u8>>,
}

/// Scripted algod node.
pub struct MockNode {
    /// Round reported by `status()`.
    pub start_round: u64,
    /// 1-based pending poll on which the transaction is confirmed.
    pub confirm_on_poll: Option<usize>,
    /// 1-based pending poll on which the pool reports an error.
    pub pool_error_on_poll: Option<usize>,
    /// Extra rounds the node is ahead of each requested round.
    pub round_skew: u64,
    /// `status()` fails.
    pub fail_status: bool,
    /// The second and later pending polls fail.
    pub fail_later_pending: bool,
    /// Delay before each long-poll answers.
    pub wait_delay: Option<Duration>,
    /// Id returned by submission instead of the payload's own.
    pub submit_override: Option<String>,
    pub asset_index: Option<u64>,
    calls: Mutex<Calls>,
}

impl MockNode {
    pub fn new(start_round: u64) -> Self {
        Self {
            start_round,
            confirm_on_poll: None,
            pool_error_on_poll: None,
            round_skew: 0,
            fail_status: false,
            fail_later_pending: false,
            wait_delay: None,
            submit_override: None,
            asset_index: None,
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn confirming_on(mut self, poll: usize) -> Self {
        self.confirm_on_poll = Some(poll);
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }

    fn current_round(calls: &Calls, start_round: u64) -> u64 {
        calls.waits.last().copied().unwrap_or(start_round)
    }
}

#[async_trait]
impl NodeApi for MockNode {
    async fn status(&self) -> NodeResult<NodeStatus> {
        self.calls.lock().unwrap().status += 1;
        if self.fail_status {
            return Err(NodeError::Http("connection refused".to_string()));
        }
        Ok(NodeStatus {
            last_round: self.start_round,
            time_since_last_round: 0,
            catchup_time: 0,
        })
    }

    async fn pending_transaction(&self, tx_id: &str) -> NodeResult<PendingTransaction> {
        let mut calls = self.calls.lock().unwrap();
        calls.pending.push(tx_id.to_string());
        let poll = calls.pending.len();

        if self.fail_later_pending && poll > 1 {
            return Err(NodeError::Status {
                status: 500,
                message: "internal error".to_string(),
            });
        }

        let mut pending = PendingTransaction::default();
        if self.confirm_on_poll == Some(poll) {
            pending.confirmed_round = Self::current_round(&calls, self.start_round) + self.round_skew;
            pending.asset_index = self.asset_index;
        } else if self.pool_error_on_poll == Some(poll) {
            pending.pool_error = "overspend".to_string();
        }
        Ok(pending)
    }

    async fn status_after_block(&self, round: u64) -> NodeResult<NodeStatus> {
        self.calls.lock().unwrap().waits.push(round);
        if let Some(delay) = self.wait_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(NodeStatus {
            last_round: round + self.round_skew,
            time_since_last_round: 0,
            catchup_time: 0,
        })
    }

    async fn suggested_params(&self) -> NodeResult<SuggestedParams> {
        self.calls.lock().unwrap().params += 1;
        Ok(suggested_params(self.start_round))
    }

    async fn send_raw_transaction(&self, signed: &[u8]) -> NodeResult<String> {
        self.calls.lock().unwrap().submitted.push(signed.to_vec());
        Ok(self
            .submit_override
            .clone()
            .unwrap_or_else(|| tx_id_of_payload(signed)))
    }
}

pub fn suggested_params(round: u64) -> SuggestedParams {
    SuggestedParams {
        fee_per_byte: 0,
        min_fee: 1000,
        first_valid: round,
        last_valid: round + 1000,
        genesis_id: "testnet-v1.0".to_string(),
        genesis_hash: [0x48; 32],
    }
}

/// Recover the transaction id a node would compute for `payload`.
///
/// Understands [`MockSigner`] payloads and `{sig, txn}` envelopes.
pub fn tx_id_of_payload(payload: &[u8]) -> String {
    if let Some(id) = payload.strip_prefix(MOCK_SIGNED_PREFIX) {
        return String::from_utf8_lossy(id).into_owned();
    }
    // fixmap(2) "sig" bin8(64) "txn" → transaction starts at byte 75
    let mut signing = b"TX".to_vec();
    signing.extend_from_slice(&payload[75..]);
    BASE32_NOPAD.encode(&Sha512_256::digest(&signing))
}

/// Signer that records what it signed and embeds a fixed id.
pub struct MockSigner {
    pub address: Address,
    pub tx_id: String,
    signed: Mutex<Vec<Transaction>>,
}

impl MockSigner {
    pub fn new(address: Address, tx_id: &str) -> Self {
        Self {
            address,
            tx_id: tx_id.to_string(),
            signed: Mutex::new(Vec::new()),
        }
    }

    pub fn signed(&self) -> Vec<Transaction> {
        self.signed.lock().unwrap().clone()
    }
}

impl TransactionSigner for MockSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_transaction(&self, txn: Transaction) -> WalletResult<SignedTransaction> {
        self.signed.lock().unwrap().push(txn);
        let mut bytes = MOCK_SIGNED_PREFIX.to_vec();
        bytes.extend_from_slice(self.tx_id.as_bytes());
        Ok(SignedTransaction {
            tx_id: self.tx_id.clone(),
            bytes,
        })
    }
}

/// A request seen by the mock HTTP backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start a programmable HTTP backend on an ephemeral port.
///
/// `f` maps each request to a status code and JSON body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}
