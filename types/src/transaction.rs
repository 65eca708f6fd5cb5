//! Ledger transactions carrying vote memos.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{TxHash, WalletAddress};

/// One transaction sent to a voting wallet, as returned by the ledger query.
///
/// `vote_power` is filled in by the tally from the voting-power table; the
/// ledger itself never supplies it, so it defaults to zero on input.
///
/// Every field decodes `null` or absence as its empty value. A sender-less
/// entry then carries an empty address and is bucketed as zero weight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender address.
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: WalletAddress,
    /// Free-text memo attached to the transaction.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Resolved vote weight of the sender (0 when unknown).
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_power: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hash: TxHash,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Transaction {
    pub fn new(from: impl Into<WalletAddress>, message: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            message: message.into(),
            vote_power: 0,
            hash: TxHash::new(hash),
        }
    }

    /// Copy of this transaction annotated with a resolved weight.
    pub fn with_vote_power(&self, vote_power: u64) -> Self {
        Self {
            vote_power,
            ..self.clone()
        }
    }
}
