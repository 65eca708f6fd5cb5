//! Withdraw service: move funds from the caller's wallet and look up the
//! resulting on-chain hash.

use crate::http::{build_client, join_url, read_json, DEFAULT_TIMEOUT};
use crate::ClientError;
use async_trait::async_trait;
use daovote_types::WalletAddress;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default pause before each hash lookup.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(5);

/// Default number of hash lookups before giving up on the hash.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 2;

/// Outcome of a completed withdrawal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub transaction_id: u64,
    /// On-chain hash, `None` when the service had not published it yet.
    pub hash: Option<String>,
}

#[async_trait]
pub trait FundsTransfer: Send + Sync {
    /// Send `amount` from the wallet behind `authorization` to `to`.
    async fn transfer(
        &self,
        authorization: &str,
        amount: u64,
        to: &WalletAddress,
    ) -> Result<TransferReceipt, ClientError>;
}

#[derive(Debug, Serialize)]
struct WithdrawRequest<'a> {
    amount: u64,
    address: &'a str,
}

#[derive(Debug, Deserialize)]
struct WithdrawResponse {
    data: WithdrawData,
}

#[derive(Debug, Deserialize)]
struct WithdrawData {
    #[serde(default)]
    transaction_id: u64,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    data: TransactionData,
}

#[derive(Debug, Deserialize)]
struct TransactionData {
    #[serde(default)]
    hash: String,
}

/// Client for `POST {withdraw_url}` followed by `GET {transactions_url}/{id}`.
pub struct WithdrawClient {
    http_client: reqwest::Client,
    withdraw_url: String,
    transactions_url: String,
    poll_delay: Duration,
    poll_attempts: u32,
}

impl WithdrawClient {
    pub fn new(withdraw_url: impl Into<String>, transactions_url: impl Into<String>) -> Self {
        Self {
            http_client: build_client(DEFAULT_TIMEOUT),
            withdraw_url: withdraw_url.into(),
            transactions_url: transactions_url.into(),
            poll_delay: DEFAULT_POLL_DELAY,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = build_client(timeout);
        self
    }

    pub fn with_polling(mut self, delay: Duration, attempts: u32) -> Self {
        self.poll_delay = delay;
        self.poll_attempts = attempts;
        self
    }

    async fn lookup_hash(&self, authorization: &str, id: u64) -> Result<String, ClientError> {
        let response = self
            .http_client
            .get(join_url(&self.transactions_url, &id.to_string()))
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let body: TransactionResponse = read_json(response).await?;
        Ok(body.data.hash)
    }
}

#[async_trait]
impl FundsTransfer for WithdrawClient {
    async fn transfer(
        &self,
        authorization: &str,
        amount: u64,
        to: &WalletAddress,
    ) -> Result<TransferReceipt, ClientError> {
        let response = self
            .http_client
            .post(&self.withdraw_url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&WithdrawRequest {
                amount,
                address: to.as_str(),
            })
            .send()
            .await?;
        let body: WithdrawResponse = read_json(response).await?;
        let transaction_id = body.data.transaction_id;
        if transaction_id == 0 {
            return Err(ClientError::InvalidResponse(
                "withdraw response carries no transaction id".to_string(),
            ));
        }
        info!(transaction_id, to = %to, amount, "withdrawal accepted");

        for attempt in 1..=self.poll_attempts {
            tokio::time::sleep(self.poll_delay).await;
            match self.lookup_hash(authorization, transaction_id).await {
                Ok(hash) if !hash.is_empty() => {
                    debug!(transaction_id, attempt, "transaction hash published");
                    return Ok(TransferReceipt {
                        transaction_id,
                        hash: Some(hash),
                    });
                }
                Ok(_) => debug!(transaction_id, attempt, "transaction hash not yet published"),
                Err(e) => warn!(transaction_id, attempt, "hash lookup failed: {e}"),
            }
        }

        warn!(transaction_id, "gave up waiting for the transaction hash");
        Ok(TransferReceipt {
            transaction_id,
            hash: None,
        })
    }
}
