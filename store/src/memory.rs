//! In-memory backend. Used by tests and by `--store memory` deployments.
//!
//! Each table sits behind its own mutex. Operations touching both proposals
//! and ballots always lock proposals first.

use crate::{
    Ballot, BallotId, BallotStore, NewBallot, NewProposal, Proposal, ProposalId, ProposalStore,
    StoreError, VotingPowerStore,
};
use daovote_types::WalletAddress;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Proposals {
    next_id: ProposalId,
    rows: BTreeMap<ProposalId, Proposal>,
}

#[derive(Default)]
struct Ballots {
    next_id: BallotId,
    by_proposal: HashMap<ProposalId, Vec<Ballot>>,
}

/// Thread-safe in-memory store for proposals, ballots and voting power.
#[derive(Default)]
pub struct MemoryStore {
    proposals: Mutex<Proposals>,
    ballots: Mutex<Ballots>,
    weights: Mutex<BTreeMap<WalletAddress, u64>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProposalStore for MemoryStore {
    fn insert_proposal(&self, proposal: NewProposal) -> Result<Proposal, StoreError> {
        let mut proposals = lock(&self.proposals);
        proposals.next_id += 1;
        let id = proposals.next_id;
        let stored = Proposal::from_new(id, proposal);
        proposals.rows.insert(id, stored.clone());
        Ok(stored)
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Proposal, StoreError> {
        lock(&self.proposals)
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))
    }

    fn delete_proposal(&self, id: ProposalId) -> Result<(), StoreError> {
        let mut proposals = lock(&self.proposals);
        if proposals.rows.remove(&id).is_none() {
            return Err(StoreError::NotFound(format!("proposal {id}")));
        }
        lock(&self.ballots).by_proposal.remove(&id);
        Ok(())
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        Ok(lock(&self.proposals).rows.len() as u64)
    }
}

impl BallotStore for MemoryStore {
    fn insert_ballot(&self, ballot: NewBallot) -> Result<Ballot, StoreError> {
        // Held until the ballot is stored so a concurrent delete cannot orphan it.
        let proposals = lock(&self.proposals);
        if !proposals.rows.contains_key(&ballot.proposal_id) {
            return Err(StoreError::NotFound(format!(
                "proposal {}",
                ballot.proposal_id
            )));
        }
        let mut ballots = lock(&self.ballots);
        ballots.next_id += 1;
        let stored = Ballot::from_new(ballots.next_id, ballot);
        ballots
            .by_proposal
            .entry(stored.proposal_id)
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    fn ballots_for(&self, proposal: ProposalId) -> Result<Vec<Ballot>, StoreError> {
        Ok(lock(&self.ballots)
            .by_proposal
            .get(&proposal)
            .cloned()
            .unwrap_or_default())
    }
}

impl VotingPowerStore for MemoryStore {
    fn put_weight(&self, address: &WalletAddress, weight: u64) -> Result<(), StoreError> {
        lock(&self.weights).insert(address.clone(), weight);
        Ok(())
    }

    fn delete_weight(&self, address: &WalletAddress) -> Result<(), StoreError> {
        lock(&self.weights)
            .remove(address)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(address.to_string()))
    }

    fn iter_weights(&self) -> Result<Vec<(WalletAddress, u64)>, StoreError> {
        Ok(lock(&self.weights)
            .iter()
            .map(|(address, weight)| (address.clone(), *weight))
            .collect())
    }
}
