//! Transaction classification: which bucket a memo transaction falls into.
//!
//! Checks run in strict priority order:
//! 1. **ZeroWeight**: sender unknown to the table or registered with weight 0
//! 2. **InvalidMemo**: memo empty after normalization
//! 3. **Duplicate**: sender already cast a valid vote earlier in this pass
//! 4. **VoteFor / VoteAgainst**: memo in the accept / reject vocabulary,
//!    otherwise **InvalidMemo**
//!
//! Only VoteFor and VoteAgainst mark the sender as seen, so a zero-weight or
//! malformed transaction never blocks a later valid one from the same sender.

use crate::voting_power::VotingPowerTable;
use daovote_types::{normalize_memo, Transaction, VoteChoice, WalletAddress};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome bucket of one transaction. Buckets are mutually exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    VoteFor,
    VoteAgainst,
    Duplicate,
    ZeroWeight,
    InvalidMemo,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VoteFor => "vote_for",
            Self::VoteAgainst => "vote_against",
            Self::Duplicate => "duplicate",
            Self::ZeroWeight => "zero_weight",
            Self::InvalidMemo => "invalid_memo",
        }
    }
}

/// Classify `tx` given the senders already seen in this pass.
///
/// `seen` is updated only when the transaction is a valid vote.
pub fn classify(
    tx: &Transaction,
    table: &VotingPowerTable,
    seen: &mut HashSet<WalletAddress>,
) -> Classification {
    let weight = table.weight_of(&tx.from).unwrap_or(0);
    if weight == 0 {
        return Classification::ZeroWeight;
    }

    let memo = normalize_memo(&tx.message);
    if memo.is_empty() {
        return Classification::InvalidMemo;
    }

    if seen.contains(&tx.from) {
        return Classification::Duplicate;
    }

    let classification = match VoteChoice::from_normalized(&memo) {
        Some(VoteChoice::For) => Classification::VoteFor,
        Some(VoteChoice::Against) => Classification::VoteAgainst,
        None => return Classification::InvalidMemo,
    };
    seen.insert(tx.from.clone());
    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting_power::{TotalVoices, VotingPowerEntry};

    fn table() -> VotingPowerTable {
        VotingPowerTable::from_entries(
            [
                VotingPowerEntry {
                    address: WalletAddress::new("a"),
                    weight: 100,
                },
                VotingPowerEntry {
                    address: WalletAddress::new("zero"),
                    weight: 0,
                },
            ],
            TotalVoices::Sum,
        )
        .unwrap()
    }

    fn tx(from: &str, memo: &str) -> Transaction {
        Transaction::new(from, memo, format!("{from}-{memo}"))
    }

    #[test]
    fn unknown_sender_is_zero_weight_even_with_valid_memo() {
        let mut seen = HashSet::new();
        assert_eq!(
            classify(&tx("stranger", "за"), &table(), &mut seen),
            Classification::ZeroWeight
        );
        assert!(seen.is_empty());
    }

    #[test]
    fn registered_zero_weight_is_zero_weight() {
        let mut seen = HashSet::new();
        assert_eq!(
            classify(&tx("zero", "за"), &table(), &mut seen),
            Classification::ZeroWeight
        );
    }

    #[test]
    fn zero_weight_takes_priority_over_empty_memo() {
        let mut seen = HashSet::new();
        assert_eq!(
            classify(&tx("stranger", ""), &table(), &mut seen),
            Classification::ZeroWeight
        );
    }

    #[test]
    fn empty_memo_does_not_mark_sender() {
        let table = table();
        let mut seen = HashSet::new();
        assert_eq!(classify(&tx("a", "  \"\" "), &table, &mut seen), Classification::InvalidMemo);
        assert!(seen.is_empty());
        assert_eq!(classify(&tx("a", "за"), &table, &mut seen), Classification::VoteFor);
    }

    #[test]
    fn unrecognized_memo_does_not_mark_sender() {
        let table = table();
        let mut seen = HashSet::new();
        assert_eq!(classify(&tx("a", "maybe"), &table, &mut seen), Classification::InvalidMemo);
        assert!(seen.is_empty());
        assert_eq!(classify(&tx("a", "нет"), &table, &mut seen), Classification::VoteAgainst);
    }

    #[test]
    fn duplicate_checked_before_memo_vocabulary() {
        let table = table();
        let mut seen = HashSet::new();
        assert_eq!(classify(&tx("a", "за"), &table, &mut seen), Classification::VoteFor);
        // Latin "za" is not in the vocabulary, but the sender already voted.
        assert_eq!(classify(&tx("a", "za"), &table, &mut seen), Classification::Duplicate);
        assert_eq!(classify(&tx("a", "против"), &table, &mut seen), Classification::Duplicate);
    }

    #[test]
    fn empty_memo_after_vote_is_invalid_not_duplicate() {
        let table = table();
        let mut seen = HashSet::new();
        classify(&tx("a", "да"), &table, &mut seen);
        assert_eq!(classify(&tx("a", ""), &table, &mut seen), Classification::InvalidMemo);
    }
}
