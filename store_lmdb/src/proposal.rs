//! LMDB implementation of ProposalStore.

use daovote_store::{NewProposal, Proposal, ProposalId, ProposalStore, StoreError};

use crate::meta::NEXT_PROPOSAL_ID_KEY;
use crate::{LmdbEnvironment, LmdbError};

impl ProposalStore for LmdbEnvironment {
    fn insert_proposal(&self, proposal: NewProposal) -> Result<Proposal, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = self.next_id(&mut wtxn, NEXT_PROPOSAL_ID_KEY)?;
        let stored = Proposal::from_new(id, proposal);
        let bytes = bincode::serialize(&stored).map_err(LmdbError::from)?;
        self.proposals_db
            .put(&mut wtxn, &id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(stored)
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Proposal, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .proposals_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("proposal {id}")))?;
        Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
    }

    fn delete_proposal(&self, id: ProposalId) -> Result<(), StoreError> {
        let key = id.to_be_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existed = self
            .proposals_db
            .delete(&mut wtxn, &key)
            .map_err(LmdbError::from)?;
        if !existed {
            return Err(LmdbError::NotFound(format!("proposal {id}")).into());
        }

        let ballot_keys: Vec<Vec<u8>> = self
            .ballots_db
            .prefix_iter(&wtxn, &key)
            .map_err(LmdbError::from)?
            .map(|entry| entry.map(|(k, _)| k.to_vec()))
            .collect::<Result<_, heed::Error>>()
            .map_err(LmdbError::from)?;
        for ballot_key in &ballot_keys {
            self.ballots_db
                .delete(&mut wtxn, ballot_key)
                .map_err(LmdbError::from)?;
        }

        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!(id, ballots = ballot_keys.len(), "deleted proposal");
        Ok(())
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.proposals_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
