//! Monotonic id counters kept in the meta database.

use heed::RwTxn;

use crate::{LmdbEnvironment, LmdbError};

pub(crate) const NEXT_PROPOSAL_ID_KEY: &[u8] = b"next_proposal_id";
pub(crate) const NEXT_BALLOT_ID_KEY: &[u8] = b"next_ballot_id";

pub(crate) fn decode_u64(bytes: &[u8], what: &str) -> Result<u64, LmdbError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| LmdbError::Serialization(format!("{what} has unexpected byte length")))?;
    Ok(u64::from_be_bytes(arr))
}

impl LmdbEnvironment {
    /// Bump the counter under `key` inside `wtxn` and return the new value.
    /// Counters start at 1 and are never reused.
    pub(crate) fn next_id(&self, wtxn: &mut RwTxn, key: &[u8]) -> Result<u64, LmdbError> {
        let current = match self.meta_db.get(wtxn, key)? {
            Some(bytes) => decode_u64(bytes, "id counter")?,
            None => 0,
        };
        let next = current + 1;
        self.meta_db.put(wtxn, key, &next.to_be_bytes())?;
        Ok(next)
    }
}
