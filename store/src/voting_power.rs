//! Persisted voting-power rows.

use crate::StoreError;
use daovote_types::WalletAddress;

/// Trait for storing the address → weight table.
pub trait VotingPowerStore {
    fn put_weight(&self, address: &WalletAddress, weight: u64) -> Result<(), StoreError>;

    fn delete_weight(&self, address: &WalletAddress) -> Result<(), StoreError>;

    /// All stored rows, sorted by address.
    fn iter_weights(&self) -> Result<Vec<(WalletAddress, u64)>, StoreError>;
}
