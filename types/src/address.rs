//! Wallet address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A chain wallet address as reported by the explorer (e.g. `d01...`).
///
/// The service never derives addresses itself; it only compares them, so the
/// only structural rule is that an address is a non-empty token without
/// whitespace. Equality is exact (case-sensitive), matching how the ledger
/// reports senders.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Wrap a raw address string coming from a trusted source (ledger, store).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse untrusted input, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(TypesError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WalletAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WalletAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
