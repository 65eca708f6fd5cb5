//! Nullable funds transfer that records transfers without moving money.

use async_trait::async_trait;
use daovote_clients::{ClientError, FundsTransfer, TransferReceipt};
use daovote_types::WalletAddress;
use std::sync::Mutex;

/// One transfer the service asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedTransfer {
    pub authorization: String,
    pub amount: u64,
    pub to: WalletAddress,
}

#[derive(Default)]
pub struct NullTransfer {
    sent: Mutex<Vec<RecordedTransfer>>,
    failing: Mutex<bool>,
}

impl NullTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following transfer fail.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// All transfers requested so far (for assertions).
    pub fn sent(&self) -> Vec<RecordedTransfer> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl FundsTransfer for NullTransfer {
    async fn transfer(
        &self,
        authorization: &str,
        amount: u64,
        to: &WalletAddress,
    ) -> Result<TransferReceipt, ClientError> {
        if *self.failing.lock().unwrap() {
            return Err(ClientError::RequestFailed("null transfer refused".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(RecordedTransfer {
            authorization: authorization.to_string(),
            amount,
            to: to.clone(),
        });
        let transaction_id = sent.len() as u64;
        Ok(TransferReceipt {
            transaction_id,
            hash: Some(format!("NULLHASH{transaction_id}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_transfers_and_numbers_receipts() {
        let transfer = NullTransfer::new();
        let dao = WalletAddress::new("dao");
        let first = transfer.transfer("Bearer a", 1, &dao).await.unwrap();
        let second = transfer.transfer("Bearer b", 1, &dao).await.unwrap();
        assert_eq!(first.transaction_id, 1);
        assert_eq!(second.hash.as_deref(), Some("NULLHASH2"));
        assert_eq!(transfer.sent().len(), 2);
        assert_eq!(transfer.sent()[1].authorization, "Bearer b");
    }

    #[tokio::test]
    async fn failing_transfer_records_nothing() {
        let transfer = NullTransfer::new();
        transfer.set_failing(true);
        assert!(transfer
            .transfer("Bearer a", 1, &WalletAddress::new("dao"))
            .await
            .is_err());
        assert!(transfer.sent().is_empty());
    }
}
