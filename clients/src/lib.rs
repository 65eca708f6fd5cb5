//! Collaborators of the vote service.
//!
//! The service talks to three external HTTP services:
//! - a ledger explorer listing the transactions received by a wallet
//! - an identity service resolving a bearer token to the user's wallet
//! - a withdraw service moving funds from the user's wallet
//!
//! Each is a trait so the HTTP layer can run against in-process doubles in
//! tests. The `reqwest` implementations here are used in production.

pub mod error;
pub mod identity;
pub mod ledger;
pub mod transfer;

mod http;

pub use error::ClientError;
pub use identity::{AuthClient, IdentityProvider};
pub use ledger::{ExplorerClient, LedgerSource};
pub use transfer::{FundsTransfer, TransferReceipt, WithdrawClient};
