//! LMDB environment setup.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use tracing::info;

use crate::LmdbError;

/// Named databases opened inside the environment.
pub const PROPOSALS_DB: &str = "proposals";
pub const BALLOTS_DB: &str = "ballots";
pub const VOTING_POWER_DB: &str = "voting_power";
pub const META_DB: &str = "meta";

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;
pub const DEFAULT_MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles.
///
/// Keys:
/// - proposals: `proposal_id (u64 BE)`
/// - ballots: `proposal_id (u64 BE) ++ ballot_id (u64 BE)`, so a prefix scan
///   yields one proposal's ballots in insertion order
/// - voting_power: address bytes → weight (u64 BE)
/// - meta: id counters
pub struct LmdbEnvironment {
    pub(crate) env: Arc<Env>,
    pub(crate) proposals_db: Database<Bytes, Bytes>,
    pub(crate) ballots_db: Database<Bytes, Bytes>,
    pub(crate) voting_power_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        fs::create_dir_all(path).map_err(|e| LmdbError::Heed(e.to_string()))?;

        // SAFETY: the environment is opened once per path by this process and
        // never memory-mapped elsewhere while it is alive.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let proposals_db = env.create_database(&mut wtxn, Some(PROPOSALS_DB))?;
        let ballots_db = env.create_database(&mut wtxn, Some(BALLOTS_DB))?;
        let voting_power_db = env.create_database(&mut wtxn, Some(VOTING_POWER_DB))?;
        let meta_db = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        info!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            proposals_db,
            ballots_db,
            voting_power_db,
            meta_db,
            path: path.to_path_buf(),
        })
    }

    /// Open with the default limits.
    pub fn open_default(path: &Path) -> Result<Self, LmdbError> {
        Self::open(path, DEFAULT_MAX_DBS, DEFAULT_MAP_SIZE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
