//! Nullable ledger: programmed transaction lists per wallet.

use async_trait::async_trait;
use daovote_clients::{ClientError, LedgerSource};
use daovote_types::{Transaction, WalletAddress};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory ledger. Wallets with no programmed transactions return an
/// empty list.
#[derive(Default)]
pub struct NullLedger {
    transactions: Mutex<HashMap<WalletAddress, Vec<Transaction>>>,
    /// `(wallet, limit, offset)` of every query, in order.
    queries: Mutex<Vec<(WalletAddress, usize, usize)>>,
    unreachable: Mutex<bool>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program the transactions received by `wallet`.
    pub fn set_transactions(&self, wallet: WalletAddress, txs: Vec<Transaction>) {
        self.transactions.lock().unwrap().insert(wallet, txs);
    }

    /// Make every following query fail as if the explorer were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock().unwrap() = unreachable;
    }

    pub fn queries(&self) -> Vec<(WalletAddress, usize, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerSource for NullLedger {
    async fn transactions(
        &self,
        wallet: &WalletAddress,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>, ClientError> {
        self.queries
            .lock()
            .unwrap()
            .push((wallet.clone(), limit, offset));
        if *self.unreachable.lock().unwrap() {
            return Err(ClientError::Unreachable("null ledger is offline".to_string()));
        }
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .get(wallet)
            .map(|txs| txs.iter().skip(offset).take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
