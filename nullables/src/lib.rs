//! Nullable collaborators for deterministic testing.
//!
//! Every external service the vote API talks to is abstracted behind a trait
//! in `daovote-clients`. This crate provides test-friendly implementations
//! that:
//! - Return programmed values
//! - Record what they were asked to do
//! - Never touch the network
//!
//! Usage: swap the HTTP clients for nullables in tests.

pub mod identity;
pub mod ledger;
pub mod transfer;

pub use identity::NullIdentity;
pub use ledger::NullLedger;
pub use transfer::{NullTransfer, RecordedTransfer};
