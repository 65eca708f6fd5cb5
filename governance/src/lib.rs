//! Memo-vote governance for a DAO team wallet.
//!
//! Members vote by sending a transaction to a voting wallet with a memo such
//! as `за` or `против`. The tally classifies every transaction into exactly
//! one bucket, counts each sender's first valid vote once, weights it by the
//! sender's voting power, and resolves the vote once either side reaches the
//! required majority of the total voice weight.
//!
//! Key principle: weight comes only from the [`VotingPowerTable`]; a sender
//! missing from the table contributes nothing and never aborts a tally.

pub mod classifier;
pub mod error;
pub mod params;
pub mod service;
pub mod tally;
pub mod voting_power;

pub use classifier::{classify, Classification};
pub use error::GovernanceError;
pub use params::TallyParams;
pub use service::{DaoService, ProposalDraft};
pub use tally::{percentage, Resolution, TallyBuckets, TallyEngine, TallyResult, VotingStatus};
pub use voting_power::{SharedVotingPower, TotalVoices, VotingPowerEntry, VotingPowerTable};
