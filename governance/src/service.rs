//! The DAO service context: voting power, proposal/ballot storage and the
//! tally engine behind one handle shared by every request.

use crate::error::GovernanceError;
use crate::tally::{TallyEngine, TallyResult};
use crate::voting_power::{SharedVotingPower, VotingPowerEntry, VotingPowerTable};
use daovote_store::{Ballot, NewBallot, NewProposal, Proposal, ProposalId, StoreError, VoteStore};
use daovote_types::{Transaction, VoteChoice, WalletAddress};
use std::sync::{Arc, PoisonError, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// User input for a new proposal. The creator's weight is filled in by
/// [`DaoService::create_proposal`].
#[derive(Clone, Debug)]
pub struct ProposalDraft {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub creator: WalletAddress,
    pub choice: VoteChoice,
    pub wallet_address: WalletAddress,
}

pub struct DaoService {
    voting_power: SharedVotingPower,
    store: Arc<dyn VoteStore>,
    engine: TallyEngine,
}

impl DaoService {
    pub fn new(voting_power: SharedVotingPower, store: Arc<dyn VoteStore>, engine: TallyEngine) -> Self {
        Self {
            voting_power,
            store,
            engine,
        }
    }

    /// Build the service and reconcile the table with the persisted rows.
    ///
    /// When the store already holds voting-power rows they replace the seed
    /// table. Otherwise the seeds are written to the store.
    pub fn bootstrap(
        seed: VotingPowerTable,
        store: Arc<dyn VoteStore>,
        engine: TallyEngine,
    ) -> Result<Self, GovernanceError> {
        let persisted = store.iter_weights()?;
        let table = if persisted.is_empty() {
            for entry in seed.entries() {
                store.put_weight(&entry.address, entry.weight)?;
            }
            info!(members = seed.size(), "seeded voting power from configuration");
            seed
        } else {
            let entries = persisted
                .into_iter()
                .map(|(address, weight)| VotingPowerEntry { address, weight });
            let table = VotingPowerTable::from_entries(entries, seed.total_voices_mode())?;
            info!(members = table.size(), "loaded voting power from store");
            table
        };
        info!(proposals = store.proposal_count()?, "proposal store ready");
        Ok(Self::new(table.into_shared(), store, engine))
    }

    fn table(&self) -> RwLockReadGuard<'_, VotingPowerTable> {
        self.voting_power.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn table_mut(&self) -> RwLockWriteGuard<'_, VotingPowerTable> {
        self.voting_power.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tally a batch against one snapshot of the voting-power table.
    pub fn tally(&self, transactions: &[Transaction]) -> TallyResult {
        let table = self.table();
        self.engine.tally(transactions, &table)
    }

    pub fn voting_power_of(&self, address: &WalletAddress) -> Result<u64, GovernanceError> {
        self.table().weight_of(address)
    }

    pub fn member_count(&self) -> usize {
        self.table().size()
    }

    pub fn members(&self) -> Vec<VotingPowerEntry> {
        self.table().entries()
    }

    /// Register a member in the table and the store.
    pub fn add_member(&self, address: WalletAddress, weight: u64) -> Result<(), GovernanceError> {
        let mut table = self.table_mut();
        table.add(address.clone(), weight)?;
        if let Err(e) = self.store.put_weight(&address, weight) {
            // Keep memory and store in step.
            let _ = table.remove(&address);
            return Err(e.into());
        }
        info!(address = %address, weight, "voting member added");
        Ok(())
    }

    /// Unregister a member, returning the weight it had.
    pub fn remove_member(&self, address: &WalletAddress) -> Result<u64, GovernanceError> {
        let mut table = self.table_mut();
        let weight = table.remove(address)?;
        match self.store.delete_weight(address) {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => {
                warn!(address = %address, "removed member had no stored row");
            }
            Err(e) => {
                table.add(address.clone(), weight)?;
                return Err(e.into());
            }
        }
        info!(address = %address, weight, "voting member removed");
        Ok(weight)
    }

    /// Store a new proposal. The creator must hold voting power.
    pub fn create_proposal(&self, draft: ProposalDraft) -> Result<Proposal, GovernanceError> {
        let vote_power = self
            .voting_power_of(&draft.creator)
            .map_err(|_| GovernanceError::UnknownVoter(draft.creator.to_string()))?;
        let proposal = self.store.insert_proposal(NewProposal {
            title: draft.title,
            subtitle: draft.subtitle,
            description: draft.description,
            creator: draft.creator,
            choice: draft.choice,
            vote_power,
            wallet_address: draft.wallet_address,
        })?;
        info!(id = proposal.id, creator = %proposal.creator, "proposal created");
        Ok(proposal)
    }

    pub fn get_proposal(&self, id: ProposalId) -> Result<Proposal, GovernanceError> {
        self.store.get_proposal(id).map_err(|e| not_found_as_proposal(e, id))
    }

    /// Delete a proposal together with its ballots.
    pub fn delete_proposal(&self, id: ProposalId) -> Result<(), GovernanceError> {
        self.store
            .delete_proposal(id)
            .map_err(|e| not_found_as_proposal(e, id))?;
        info!(id, "proposal deleted");
        Ok(())
    }

    /// Record a ballot. The proposal must exist and the voter must hold
    /// voting power; the ballot carries the voter's current weight.
    pub fn add_ballot(
        &self,
        proposal_id: ProposalId,
        voter: WalletAddress,
        choice: VoteChoice,
    ) -> Result<Ballot, GovernanceError> {
        self.get_proposal(proposal_id)?;
        let vote_power = self
            .voting_power_of(&voter)
            .map_err(|_| GovernanceError::UnknownVoter(voter.to_string()))?;
        let ballot = self
            .store
            .insert_ballot(NewBallot {
                proposal_id,
                voter,
                choice,
                vote_power,
            })
            .map_err(|e| not_found_as_proposal(e, proposal_id))?;
        debug!(id = ballot.id, proposal_id, voter = %ballot.voter, "ballot recorded");
        Ok(ballot)
    }

    /// Ballots of an existing proposal, in the order they were cast.
    pub fn list_ballots(&self, proposal_id: ProposalId) -> Result<Vec<Ballot>, GovernanceError> {
        self.get_proposal(proposal_id)?;
        Ok(self.store.ballots_for(proposal_id)?)
    }
}

fn not_found_as_proposal(e: StoreError, id: ProposalId) -> GovernanceError {
    match e {
        StoreError::NotFound(_) => GovernanceError::ProposalNotFound(id),
        other => GovernanceError::Store(other),
    }
}
