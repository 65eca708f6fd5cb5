//! Offset/limit parameters for the tally endpoints.

use serde::Deserialize;

/// Maximum number of transactions fetched for one tally.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Query string of `GET /dao-team-vote-results`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TallyQuery {
    pub wallet_address: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// Offset/limit of `GET /votes/:id/results`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// Resolve the effective page size, clamped to [1, MAX_PAGE_SIZE].
///
/// `default` is normally the number of registered members: each member is
/// expected to send one vote.
pub fn effective_limit(limit: Option<usize>, default: usize) -> usize {
    limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}
