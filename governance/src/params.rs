//! Tally thresholds.

use serde::{Deserialize, Serialize};

/// Share of the total voice weight (in percent) either side needs to resolve a vote.
pub const REQUIRED_MAJORITY_PCT: u64 = 51;

/// Multiplier turning a ratio into a percentage.
pub const PERCENT_FACTOR: u64 = 100;

/// Parameters of the [`TallyEngine`](crate::TallyEngine).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyParams {
    /// Inclusive majority threshold in whole percent.
    #[serde(default = "default_required_majority")]
    pub required_majority_pct: u64,
}

fn default_required_majority() -> u64 {
    REQUIRED_MAJORITY_PCT
}

impl Default for TallyParams {
    fn default() -> Self {
        Self {
            required_majority_pct: REQUIRED_MAJORITY_PCT,
        }
    }
}
