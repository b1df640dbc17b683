//! Algod REST client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the algod v2 REST endpoint
//! - Query chain state (status, pending transactions, suggested params)
//! - Submit signed transactions
//! - Bound every request with a deadline

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::node::NodeApi;
use crate::blockchain::types::{
    NodeConfig, NodeError, NodeErrorBody, NodeResult, NodeStatus, PendingTransaction,
    SubmitResponse, SuggestedParams, TransactionParamsResponse,
};

/// Environment variable name for the node API token.
pub const API_TOKEN_ENV_VAR: &str = "ASA_MINT_API_TOKEN";

/// HTTP client for a single algod node.
#[derive(Clone)]
pub struct AlgodClient {
    http: reqwest::Client,
    base_url: url::Url,
    config: NodeConfig,
    request_timeout: Duration,
    long_poll_timeout: Duration,
}

impl AlgodClient {
    /// Create a new algod client.
    ///
    /// # Arguments
    /// * `config` - Node configuration
    /// * `api_token` - Token sent in `config.api_token_header`, if any
    pub fn new(config: NodeConfig, api_token: Option<String>) -> NodeResult<Self> {
        let base_url: url::Url = config.address.parse().map_err(|e: url::ParseError| {
            NodeError::InvalidUrl {
                url: config.address.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut headers = HeaderMap::new();
        if let Some(token) = api_token.filter(|t| !t.is_empty()) {
            let name = HeaderName::from_bytes(config.api_token_header.as_bytes())
                .map_err(|e| NodeError::Http(format!("Invalid token header name: {}", e)))?;
            let mut value = HeaderValue::from_str(&token)
                .map_err(|e| NodeError::Http(format!("Invalid API token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| NodeError::Http(e.to_string()))?;

        tracing::info!(
            address = %base_url,
            token_header = %config.api_token_header,
            "Algod client created"
        );

        Ok(Self {
            http,
            base_url,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            long_poll_timeout: Duration::from_secs(config.long_poll_timeout_secs),
            config,
        })
    }

    /// Load the API token from `ASA_MINT_API_TOKEN`, if set.
    pub fn token_from_env() -> Option<String> {
        std::env::var(API_TOKEN_ENV_VAR).ok()
    }

    /// Get the configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> NodeResult<url::Url> {
        // Keep any path prefix on the base URL (hosted providers mount algod under one).
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        joined.parse().map_err(|e: url::ParseError| NodeError::InvalidUrl {
            url: joined,
            reason: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, deadline: Duration) -> NodeResult<T> {
        let request = self.http.get(self.endpoint(path)?);
        self.execute(request, path, deadline).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
        deadline: Duration,
    ) -> NodeResult<T> {
        let call = async {
            let response = request
                .send()
                .await
                .map_err(|e| NodeError::Http(e.to_string()))?;

            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| NodeError::Http(e.to_string()))?;

            if !status.is_success() {
                let message = serde_json::from_slice::<NodeErrorBody>(&body)
                    .map(|b| b.message)
                    .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
                return Err(NodeError::Status {
                    status: status.as_u16(),
                    message,
                });
            }

            serde_json::from_slice::<T>(&body).map_err(|e| NodeError::Decode(e.to_string()))
        };

        match timeout(deadline, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(path = %path, error = %e, "Node request failed");
                Err(e)
            }
            Err(_) => {
                tracing::warn!(path = %path, "Node request timed out");
                Err(NodeError::Timeout(deadline.as_secs()))
            }
        }
    }
}

#[async_trait]
impl NodeApi for AlgodClient {
    async fn status(&self) -> NodeResult<NodeStatus> {
        self.get_json("/v2/status", self.request_timeout).await
    }

    async fn pending_transaction(&self, tx_id: &str) -> NodeResult<PendingTransaction> {
        let path = format!("/v2/transactions/pending/{}?format=json", tx_id);
        self.get_json(&path, self.request_timeout).await
    }

    async fn status_after_block(&self, round: u64) -> NodeResult<NodeStatus> {
        let path = format!("/v2/status/wait-for-block-after/{}", round);
        self.get_json(&path, self.long_poll_timeout).await
    }

    async fn suggested_params(&self) -> NodeResult<SuggestedParams> {
        let raw: TransactionParamsResponse = self
            .get_json("/v2/transactions/params", self.request_timeout)
            .await?;
        SuggestedParams::try_from(raw)
    }

    async fn send_raw_transaction(&self, signed: &[u8]) -> NodeResult<String> {
        let path = "/v2/transactions";
        let request = self
            .http
            .post(self.endpoint(path)?)
            .header(CONTENT_TYPE, "application/x-binary")
            .body(signed.to_vec());
        let response: SubmitResponse = self.execute(request, path, self.request_timeout).await?;
        Ok(response.tx_id)
    }
}

impl std::fmt::Debug for AlgodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgodClient")
            .field("address", &self.config.address)
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}
