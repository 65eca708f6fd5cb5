//! HTTP API for the DAO vote service.
//!
//! Provides endpoints for:
//! - Memo-vote tallies of a DAO wallet (`/dao-team-vote-results`)
//! - User proposals and their ballots (`/votes`)
//! - Voting-power administration (`/admin/wallets`)
//! - Health and Prometheus metrics

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod pagination;
pub mod server;
pub mod state;

pub use error::RpcError;
pub use metrics::RpcMetrics;
pub use server::{router, RpcServer};
pub use state::{ApiSettings, AppState};
