//! Identity service: bearer token → wallet address.

use crate::http::{build_client, join_url, read_json, DEFAULT_TIMEOUT};
use crate::ClientError;
use async_trait::async_trait;
use daovote_types::WalletAddress;
use serde::Deserialize;
use std::time::Duration;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the `Authorization` header value to the caller's wallet.
    async fn wallet_of(&self, authorization: &str) -> Result<WalletAddress, ClientError>;
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    data: MeData,
}

#[derive(Debug, Deserialize)]
struct MeData {
    #[serde(default)]
    wallet: String,
}

/// Client for `GET {auth_url}/me?with_user_information=1`.
pub struct AuthClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
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

fn wallet_from(body: MeResponse) -> Result<WalletAddress, ClientError> {
    WalletAddress::parse(&body.data.wallet)
        .map_err(|_| ClientError::Unauthorized("user has no wallet".to_string()))
}

#[async_trait]
impl IdentityProvider for AuthClient {
    async fn wallet_of(&self, authorization: &str) -> Result<WalletAddress, ClientError> {
        let response = self
            .http_client
            .get(join_url(&self.base_url, "me"))
            .query(&[("with_user_information", "1")])
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        wallet_from(read_json(response).await?)
    }
}
