//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use daovote_governance::{TallyParams, TotalVoices, VotingPowerEntry, VotingPowerTable};

use crate::logging::LogFormat;
use crate::NodeError;

/// Where proposals, ballots and voting power are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Lmdb,
}

impl std::str::FromStr for StoreBackend {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "lmdb" => Ok(StoreBackend::Lmdb),
            other => Err(NodeError::Config(format!("unknown store backend {other:?}"))),
        }
    }
}

/// Configuration for a vote service node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Port of the HTTP API.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_store")]
    pub store: StoreBackend,

    /// Data directory for the LMDB backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Base URL of the ledger explorer API.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,

    /// Base URL of the identity service (`{auth_url}/me`).
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Endpoint accepting withdrawals.
    #[serde(default = "default_withdraw_url")]
    pub withdraw_url: String,

    /// Base URL for looking up withdrawal transactions by id.
    #[serde(default = "default_transactions_url")]
    pub transactions_url: String,

    /// Timeout of every collaborator request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Pause before each transaction-hash lookup, in seconds.
    #[serde(default = "default_poll_delay_secs")]
    pub poll_delay_secs: u64,

    /// Number of transaction-hash lookups after a withdrawal.
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    /// Amount sent to the proposal wallet after each ballot.
    #[serde(default = "default_ballot_transfer_amount")]
    pub ballot_transfer_amount: u64,

    /// Bearer token guarding the admin routes. Unset leaves them open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,

    /// Inclusive majority threshold in whole percent.
    #[serde(default = "default_required_majority_pct")]
    pub required_majority_pct: u64,

    /// Fixed percentage baseline. Unset means the sum of all weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_voices: Option<u64>,

    /// Voting-power seed, used when the store holds no rows yet.
    #[serde(default)]
    pub voting_power: Vec<VotingPowerEntry>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_port() -> u16 {
    8080
}

fn default_store() -> StoreBackend {
    StoreBackend::Memory
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./daovote_data")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_explorer_url() -> String {
    "https://mainnet-explorer-api.decimalchain.com/api".to_string()
}

fn default_auth_url() -> String {
    "https://backend.ddapps.io/api/v1/auth".to_string()
}

fn default_withdraw_url() -> String {
    "https://backend.ddapps.io/api/v1/withdraw".to_string()
}

fn default_transactions_url() -> String {
    "https://backend.ddapps.io/api/v1/transactions".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_poll_delay_secs() -> u64 {
    5
}

fn default_poll_attempts() -> u32 {
    2
}

fn default_ballot_transfer_amount() -> u64 {
    1
}

fn default_required_majority_pct() -> u64 {
    daovote_governance::params::REQUIRED_MAJORITY_PCT
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    pub fn tally_params(&self) -> Result<TallyParams, NodeError> {
        if !(1..=100).contains(&self.required_majority_pct) {
            return Err(NodeError::Config(format!(
                "required_majority_pct must be within 1..=100, got {}",
                self.required_majority_pct
            )));
        }
        Ok(TallyParams {
            required_majority_pct: self.required_majority_pct,
        })
    }

    pub fn total_voices(&self) -> TotalVoices {
        self.total_voices.map_or(TotalVoices::Sum, TotalVoices::Fixed)
    }

    /// The configured seed table. Repeated addresses are a config error.
    pub fn voting_power_table(&self) -> Result<VotingPowerTable, NodeError> {
        VotingPowerTable::from_entries(self.voting_power.iter().cloned(), self.total_voices())
            .map_err(|e| NodeError::Config(format!("voting_power: {e}")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_delay(&self) -> Duration {
        Duration::from_secs(self.poll_delay_secs)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            store: default_store(),
            data_dir: default_data_dir(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            explorer_url: default_explorer_url(),
            auth_url: default_auth_url(),
            withdraw_url: default_withdraw_url(),
            transactions_url: default_transactions_url(),
            request_timeout_secs: default_request_timeout_secs(),
            poll_delay_secs: default_poll_delay_secs(),
            poll_attempts: default_poll_attempts(),
            ballot_transfer_amount: default_ballot_transfer_amount(),
            admin_token: None,
            required_majority_pct: default_required_majority_pct(),
            total_voices: None,
            voting_power: Vec::new(),
        }
    }
}
