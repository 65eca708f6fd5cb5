//! Voting power: how much each registered address weighs in a tally.
//!
//! The table is the single source of truth for weights during a request.
//! It is seeded at startup (from configuration or the persisted store) and
//! changed only through the admin operations [`VotingPowerTable::add`] and
//! [`VotingPowerTable::remove`].

use crate::error::GovernanceError;
use daovote_types::WalletAddress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Shared handle used by the service; tallies take a read guard for the
/// whole pass so weights stay consistent within one call.
pub type SharedVotingPower = Arc<RwLock<VotingPowerTable>>;

/// How the percentage baseline of a tally is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalVoices {
    /// Sum of all registered weights.
    Sum,
    /// A configured constant, independent of table contents.
    Fixed(u64),
}

/// One registered address and its weight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPowerEntry {
    pub address: WalletAddress,
    pub weight: u64,
}

/// Mapping address → vote weight plus the total-voices baseline.
#[derive(Clone, Debug)]
pub struct VotingPowerTable {
    weights: HashMap<WalletAddress, u64>,
    total_voices: TotalVoices,
}

impl VotingPowerTable {
    pub fn new(total_voices: TotalVoices) -> Self {
        Self {
            weights: HashMap::new(),
            total_voices,
        }
    }

    /// Build a table from entries, rejecting repeated addresses.
    pub fn from_entries(
        entries: impl IntoIterator<Item = VotingPowerEntry>,
        total_voices: TotalVoices,
    ) -> Result<Self, GovernanceError> {
        let mut table = Self::new(total_voices);
        for entry in entries {
            table.add(entry.address, entry.weight)?;
        }
        Ok(table)
    }

    /// Weight of `address`. Absence is an error, not zero.
    pub fn weight_of(&self, address: &WalletAddress) -> Result<u64, GovernanceError> {
        self.weights
            .get(address)
            .copied()
            .ok_or_else(|| GovernanceError::UnknownAddress(address.to_string()))
    }

    /// Percentage baseline: the configured constant, or the sum of weights.
    pub fn total_voices(&self) -> u64 {
        match self.total_voices {
            TotalVoices::Fixed(total) => total,
            TotalVoices::Sum => self
                .weights
                .values()
                .fold(0u64, |acc, w| acc.saturating_add(*w)),
        }
    }

    pub fn total_voices_mode(&self) -> TotalVoices {
        self.total_voices
    }

    /// Number of registered addresses (the DAO member count).
    pub fn size(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Register a new address.
    pub fn add(&mut self, address: WalletAddress, weight: u64) -> Result<(), GovernanceError> {
        if self.weights.contains_key(&address) {
            return Err(GovernanceError::AlreadyExists(address.to_string()));
        }
        self.weights.insert(address, weight);
        Ok(())
    }

    /// Unregister an address, returning its former weight.
    pub fn remove(&mut self, address: &WalletAddress) -> Result<u64, GovernanceError> {
        self.weights
            .remove(address)
            .ok_or_else(|| GovernanceError::NotFound(address.to_string()))
    }

    /// All entries, sorted by address for stable output.
    pub fn entries(&self) -> Vec<VotingPowerEntry> {
        let mut entries: Vec<VotingPowerEntry> = self
            .weights
            .iter()
            .map(|(address, weight)| VotingPowerEntry {
                address: address.clone(),
                weight: *weight,
            })
            .collect();
        entries.sort_by(|a, b| a.address.cmp(&b.address));
        entries
    }

    pub fn into_shared(self) -> SharedVotingPower {
        Arc::new(RwLock::new(self))
    }
}

impl Default for VotingPowerTable {
    fn default() -> Self {
        Self::new(TotalVoices::Sum)
    }
}
