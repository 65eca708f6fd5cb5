//! LMDB implementation of VotingPowerStore.

use daovote_store::{StoreError, VotingPowerStore};
use daovote_types::WalletAddress;

use crate::meta::decode_u64;
use crate::{LmdbEnvironment, LmdbError};

impl VotingPowerStore for LmdbEnvironment {
    fn put_weight(&self, address: &WalletAddress, weight: u64) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.voting_power_db
            .put(&mut wtxn, address.as_str().as_bytes(), &weight.to_be_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_weight(&self, address: &WalletAddress) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existed = self
            .voting_power_db
            .delete(&mut wtxn, address.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        if !existed {
            return Err(LmdbError::NotFound(address.to_string()).into());
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_weights(&self) -> Result<Vec<(WalletAddress, u64)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.voting_power_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            let address = std::str::from_utf8(key)
                .map_err(|e| LmdbError::Serialization(e.to_string()))?;
            results.push((WalletAddress::new(address), decode_u64(val, "voting power")?));
        }
        Ok(results)
    }
}
