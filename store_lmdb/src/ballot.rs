//! LMDB implementation of BallotStore.

use daovote_store::{Ballot, BallotStore, NewBallot, ProposalId, StoreError};

use crate::meta::NEXT_BALLOT_ID_KEY;
use crate::{LmdbEnvironment, LmdbError};

fn ballot_key(proposal: ProposalId, ballot: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&proposal.to_be_bytes());
    key[8..].copy_from_slice(&ballot.to_be_bytes());
    key
}

impl BallotStore for LmdbEnvironment {
    fn insert_ballot(&self, ballot: NewBallot) -> Result<Ballot, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let exists = self
            .proposals_db
            .get(&wtxn, &ballot.proposal_id.to_be_bytes())
            .map_err(LmdbError::from)?
            .is_some();
        if !exists {
            return Err(LmdbError::NotFound(format!("proposal {}", ballot.proposal_id)).into());
        }

        let id = self.next_id(&mut wtxn, NEXT_BALLOT_ID_KEY)?;
        let stored = Ballot::from_new(id, ballot);
        let bytes = bincode::serialize(&stored).map_err(LmdbError::from)?;
        self.ballots_db
            .put(&mut wtxn, &ballot_key(stored.proposal_id, id), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(stored)
    }

    fn ballots_for(&self, proposal: ProposalId) -> Result<Vec<Ballot>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self
            .ballots_db
            .prefix_iter(&rtxn, &proposal.to_be_bytes())
            .map_err(LmdbError::from)?;
        let mut ballots = Vec::new();
        for entry in iter {
            let (_, bytes) = entry.map_err(LmdbError::from)?;
            ballots.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(ballots)
    }
}
