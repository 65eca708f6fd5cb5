//! Proposal records and their storage trait.

use crate::StoreError;
use daovote_types::{VoteChoice, WalletAddress};
use serde::{Deserialize, Serialize};

pub type ProposalId = u64;

/// A proposal as submitted, before the store assigns an id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProposal {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    /// Wallet of the user who created the proposal.
    pub creator: WalletAddress,
    /// The creator's own choice.
    pub choice: VoteChoice,
    /// The creator's voting power at creation time.
    pub vote_power: u64,
    /// Wallet collecting the memo votes for this proposal.
    pub wallet_address: WalletAddress,
}

/// A stored proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    #[serde(rename = "voter")]
    pub creator: WalletAddress,
    pub choice: VoteChoice,
    pub vote_power: u64,
    pub wallet_address: WalletAddress,
}

impl Proposal {
    pub fn from_new(id: ProposalId, new: NewProposal) -> Self {
        Self {
            id,
            title: new.title,
            subtitle: new.subtitle,
            description: new.description,
            creator: new.creator,
            choice: new.choice,
            vote_power: new.vote_power,
            wallet_address: new.wallet_address,
        }
    }
}

/// Trait for proposal storage. Ids are assigned by the store, sequentially from 1.
pub trait ProposalStore {
    /// Store a proposal under the next id and return the stored record.
    fn insert_proposal(&self, proposal: NewProposal) -> Result<Proposal, StoreError>;

    /// Get a proposal by id.
    fn get_proposal(&self, id: ProposalId) -> Result<Proposal, StoreError>;

    /// Delete a proposal and every ballot recorded for it.
    fn delete_proposal(&self, id: ProposalId) -> Result<(), StoreError>;

    /// Number of stored proposals.
    fn proposal_count(&self) -> Result<u64, StoreError>;
}
