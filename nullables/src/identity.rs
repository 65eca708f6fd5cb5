//! Nullable identity service with a fixed token → wallet map.

use async_trait::async_trait;
use daovote_clients::{ClientError, IdentityProvider};
use daovote_types::WalletAddress;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct NullIdentity {
    /// Keyed by the full `Authorization` header value.
    users: Mutex<HashMap<String, WalletAddress>>,
}

impl NullIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `Bearer {token}` as the user owning `wallet`.
    pub fn with_user(self, token: &str, wallet: impl Into<WalletAddress>) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(format!("Bearer {token}"), wallet.into());
        self
    }
}

#[async_trait]
impl IdentityProvider for NullIdentity {
    async fn wallet_of(&self, authorization: &str) -> Result<WalletAddress, ClientError> {
        self.users
            .lock()
            .unwrap()
            .get(authorization)
            .cloned()
            .ok_or_else(|| ClientError::Unauthorized("unknown token".to_string()))
    }
}
