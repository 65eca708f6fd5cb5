//! Vote choices and the memo vocabulary that expresses them.
//!
//! Voters cast a vote by sending a transaction whose memo says "yes" or "no"
//! in Russian, with a few transliterated and mixed-alphabet spellings that
//! appear in practice (`дa` and `зa` end in a Latin `a`, `z` is Latin).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Memos (after normalization) counted as a vote in favour.
pub const ACCEPT_MEMOS: &[&str] = &["да", "дa", "д", "за", "зa", "z"];

/// Memos (after normalization) counted as a vote against.
pub const REJECT_MEMOS: &[&str] = &["нет", "н", "против"];

/// Normalize a raw memo: trim whitespace, lower-case, then strip the `"`
/// character from both ends.
///
/// Whitespace is trimmed only once, before the quotes are removed, so
/// `"\" за \""` normalizes to `" за "` and does not match the vocabulary.
pub fn normalize_memo(raw: &str) -> String {
    raw.trim().to_lowercase().trim_matches('"').to_string()
}

/// Direction of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    #[serde(rename = "За")]
    For,
    #[serde(rename = "Против")]
    Against,
}

impl VoteChoice {
    /// Match an already-normalized memo against the vocabulary.
    pub fn from_normalized(memo: &str) -> Option<Self> {
        if ACCEPT_MEMOS.contains(&memo) {
            Some(Self::For)
        } else if REJECT_MEMOS.contains(&memo) {
            Some(Self::Against)
        } else {
            None
        }
    }

    /// Normalize a raw memo and match it against the vocabulary.
    pub fn from_memo(raw: &str) -> Option<Self> {
        Self::from_normalized(&normalize_memo(raw))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::For => "За",
            Self::Against => "Против",
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteChoice {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_memo(s).ok_or_else(|| TypesError::InvalidChoice(s.to_string()))
    }
}
