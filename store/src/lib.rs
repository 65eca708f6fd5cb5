//! Abstract storage traits for the DAO vote service.
//!
//! Every storage backend (in-memory, LMDB) implements these traits. The rest
//! of the codebase depends only on the traits.

pub mod ballot;
pub mod error;
pub mod memory;
pub mod proposal;
pub mod voting_power;

pub use ballot::{Ballot, BallotId, BallotStore, NewBallot};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use proposal::{NewProposal, Proposal, ProposalId, ProposalStore};
pub use voting_power::VotingPowerStore;

/// Everything the service needs from a backend.
pub trait VoteStore: ProposalStore + BallotStore + VotingPowerStore + Send + Sync {}

impl<T> VoteStore for T where T: ProposalStore + BallotStore + VotingPowerStore + Send + Sync {}
