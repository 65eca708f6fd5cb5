//! Ballot records and their storage trait.

use crate::{ProposalId, StoreError};
use daovote_types::{VoteChoice, WalletAddress};
use serde::{Deserialize, Serialize};

pub type BallotId = u64;

/// A ballot as submitted, before the store assigns an id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBallot {
    pub proposal_id: ProposalId,
    pub voter: WalletAddress,
    pub choice: VoteChoice,
    pub vote_power: u64,
}

/// A stored ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub id: BallotId,
    #[serde(rename = "vote_id")]
    pub proposal_id: ProposalId,
    pub voter: WalletAddress,
    pub choice: VoteChoice,
    pub vote_power: u64,
}

impl Ballot {
    pub fn from_new(id: BallotId, new: NewBallot) -> Self {
        Self {
            id,
            proposal_id: new.proposal_id,
            voter: new.voter,
            choice: new.choice,
            vote_power: new.vote_power,
        }
    }
}

/// Trait for ballot storage. Ballot ids come from one counter shared by all
/// proposals.
pub trait BallotStore {
    /// Append a ballot to an existing proposal.
    ///
    /// Fails with [`StoreError::NotFound`] when the proposal does not exist.
    fn insert_ballot(&self, ballot: NewBallot) -> Result<Ballot, StoreError>;

    /// All ballots of a proposal in insertion order (empty when none were cast).
    fn ballots_for(&self, proposal: ProposalId) -> Result<Vec<Ballot>, StoreError>;
}
