//! Ledger explorer: the transactions received by a wallet.

use crate::http::{build_client, join_url, read_json, DEFAULT_TIMEOUT};
use crate::ClientError;
use async_trait::async_trait;
use daovote_types::{Transaction, WalletAddress};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of the memo transactions sent to a wallet, newest first as the
/// explorer returns them.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    async fn transactions(
        &self,
        wallet: &WalletAddress,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>, ClientError>;
}

/// `{"result": {"txs": [...]}}`
#[derive(Debug, Deserialize)]
struct TxsResponse {
    result: TxsResult,
}

#[derive(Debug, Deserialize)]
struct TxsResult {
    #[serde(default)]
    txs: Vec<Value>,
}

impl TxsResult {
    /// Decode each entry on its own. An entry that is not a transaction
    /// object keeps its hash and nothing else, so it still lands in a bucket.
    fn into_transactions(self) -> Vec<Transaction> {
        self.txs
            .into_iter()
            .map(|entry| {
                serde_json::from_value::<Transaction>(entry.clone()).unwrap_or_else(|e| {
                    let hash = entry.get("hash").and_then(Value::as_str).unwrap_or_default();
                    warn!(hash, "malformed explorer transaction: {e}");
                    Transaction::new("", "", hash)
                })
            })
            .collect()
    }
}

/// Client for the explorer's `GET /address/{wallet}/txs` endpoint.
pub struct ExplorerClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ExplorerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client: build_client(timeout),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl LedgerSource for ExplorerClient {
    async fn transactions(
        &self,
        wallet: &WalletAddress,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>, ClientError> {
        let url = join_url(&self.base_url, &format!("address/{wallet}/txs"));
        let response = self
            .http_client
            .get(&url)
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;
        let body: TxsResponse = read_json(response).await?;
        let txs = body.result.into_transactions();
        debug!(wallet = %wallet, count = txs.len(), "fetched transactions");
        Ok(txs)
    }
}
