//! Tally engine: weighted turnout and majority over a list of memo transactions.

use crate::classifier::{classify, Classification};
use crate::error::GovernanceError;
use crate::params::{TallyParams, PERCENT_FACTOR};
use crate::voting_power::VotingPowerTable;
use daovote_types::{Transaction, WalletAddress};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Whether the vote is still open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingStatus {
    Active,
    Completed,
}

/// Outcome of the vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Accepted,
    Rejected,
    Undecided,
}

impl VotingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Undecided => "Undecided",
        }
    }
}

/// Transactions grouped by classification, each annotated with the sender's
/// resolved weight. Input order is preserved inside every list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TallyBuckets {
    /// Counted votes (for and against), in input order.
    pub valid: Vec<Transaction>,
    pub duplicate: Vec<Transaction>,
    pub zero_weight: Vec<Transaction>,
    pub invalid_memo: Vec<Transaction>,
}

impl TallyBuckets {
    pub fn len(&self) -> usize {
        self.valid.len() + self.duplicate.len() + self.zero_weight.len() + self.invalid_memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of one tally pass. Derived data, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TallyResult {
    /// Registered addresses (turnout denominator).
    pub total_members: usize,
    pub total_transactions: usize,
    /// Unique senders counted for either side.
    pub voted_members: usize,
    /// Senders counted for the proposal.
    pub for_voters: usize,
    /// Senders counted against the proposal.
    pub against_voters: usize,
    pub turnout_pct: f64,
    /// Percentage baseline used for both sides.
    pub total_voices: u64,
    pub for_strength: u64,
    pub for_pct: f64,
    pub against_strength: u64,
    pub against_pct: f64,
    pub status: VotingStatus,
    pub resolution: Resolution,
    pub buckets: TallyBuckets,
}

impl TallyResult {
    /// Transactions per classification, in a fixed order.
    pub fn classification_counts(&self) -> [(Classification, usize); 5] {
        [
            (Classification::VoteFor, self.for_voters),
            (Classification::VoteAgainst, self.against_voters),
            (Classification::Duplicate, self.buckets.duplicate.len()),
            (Classification::ZeroWeight, self.buckets.zero_weight.len()),
            (Classification::InvalidMemo, self.buckets.invalid_memo.len()),
        ]
    }
}

/// `value / total * 100`, undefined when `total` is zero.
pub fn percentage(value: u64, total: u64) -> Result<f64, GovernanceError> {
    if total == 0 {
        return Err(GovernanceError::DivisionUndefined("total"));
    }
    Ok(value as f64 * PERCENT_FACTOR as f64 / total as f64)
}

/// Exact integer form of `value / total * 100 >= threshold_pct`.
fn reaches(value: u64, total: u64, threshold_pct: u64) -> bool {
    total != 0 && value as u128 * PERCENT_FACTOR as u128 >= threshold_pct as u128 * total as u128
}

/// Aggregates classified transactions into a [`TallyResult`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TallyEngine {
    params: TallyParams,
}

impl TallyEngine {
    pub fn new(params: TallyParams) -> Self {
        Self { params }
    }

    /// Classify `transactions` in order and compute the weighted result.
    ///
    /// Never fails: unknown senders land in the zero-weight bucket and
    /// zero denominators are reported as 0%.
    pub fn tally(&self, transactions: &[Transaction], table: &VotingPowerTable) -> TallyResult {
        let mut seen = HashSet::new();
        let mut buckets = TallyBuckets::default();
        let mut for_votes = Vec::new();
        let mut against_votes = Vec::new();

        for tx in transactions {
            let classification = classify(tx, table, &mut seen);
            let annotated = tx.with_vote_power(table.weight_of(&tx.from).unwrap_or(0));
            debug!(
                from = %tx.from,
                hash = %tx.hash,
                bucket = classification.as_str(),
                "classified transaction"
            );
            match classification {
                Classification::VoteFor => {
                    for_votes.push(tx.from.clone());
                    buckets.valid.push(annotated);
                }
                Classification::VoteAgainst => {
                    against_votes.push(tx.from.clone());
                    buckets.valid.push(annotated);
                }
                Classification::Duplicate => buckets.duplicate.push(annotated),
                Classification::ZeroWeight => buckets.zero_weight.push(annotated),
                Classification::InvalidMemo => buckets.invalid_memo.push(annotated),
            }
        }

        let strength = |senders: &[WalletAddress]| -> u64 {
            senders.iter().fold(0u64, |acc, sender| match table.weight_of(sender) {
                Ok(weight) => acc.saturating_add(weight),
                Err(e) => {
                    warn!("skipping weight for {sender}: {e}");
                    acc
                }
            })
        };
        let for_strength = strength(&for_votes);
        let against_strength = strength(&against_votes);

        let total_voices = table.total_voices();
        let for_pct = pct_or_zero(for_strength, total_voices, "votes for");
        let against_pct = pct_or_zero(against_strength, total_voices, "votes against");

        let majority = self.params.required_majority_pct;
        let (status, resolution) = if reaches(for_strength, total_voices, majority) {
            (VotingStatus::Completed, Resolution::Accepted)
        } else if reaches(against_strength, total_voices, majority) {
            (VotingStatus::Completed, Resolution::Rejected)
        } else {
            (VotingStatus::Active, Resolution::Undecided)
        };

        let total_members = table.size();
        let voted_members = for_votes.len() + against_votes.len();
        let turnout_pct = pct_or_zero(voted_members as u64, total_members as u64, "turnout");

        debug!(
            total_members,
            voted_members,
            for_strength,
            against_strength,
            total_voices,
            status = status.as_str(),
            resolution = resolution.as_str(),
            "tally complete"
        );

        TallyResult {
            total_members,
            total_transactions: transactions.len(),
            voted_members,
            for_voters: for_votes.len(),
            against_voters: against_votes.len(),
            turnout_pct,
            total_voices,
            for_strength,
            for_pct,
            against_strength,
            against_pct,
            status,
            resolution,
            buckets,
        }
    }
}

fn pct_or_zero(value: u64, total: u64, what: &str) -> f64 {
    percentage(value, total).unwrap_or_else(|e| {
        warn!("{what}: {e}, reporting 0%");
        0.0
    })
}
