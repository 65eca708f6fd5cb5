//! Fundamental types for the DAO memo-vote service.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! wallet addresses, transaction hashes, ledger transactions, and vote choices
//! (including the memo vocabulary that maps free text onto a choice).

pub mod address;
pub mod choice;
pub mod error;
pub mod hash;
pub mod transaction;

pub use address::WalletAddress;
pub use choice::{normalize_memo, VoteChoice};
pub use error::TypesError;
pub use hash::TxHash;
pub use transaction::Transaction;
