//! LMDB storage backend for the DAO vote service.
//!
//! Implements the storage traits from `daovote-store` using the `heed` LMDB
//! bindings. Each logical table maps to one LMDB database within a single
//! environment.

pub mod ballot;
pub mod environment;
pub mod error;
pub mod meta;
pub mod proposal;
pub mod voting_power;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
