//! Client configuration with TOML file support.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chainbadge_issuance::IssuanceConfig;
use chainbadge_types::NetworkId;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("invalid config: {0}")]
    Parse(String),
    #[error("config not serializable: {0}")]
    Serialize(String),
}

/// Configuration for the `chainbadge` client.
///
/// Loaded from a TOML file via [`ClientConfig::from_toml_file`]; command
/// line flags and `CHAINBADGE_*` variables override individual fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Which ledger network to talk to.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Ledger node URL. Defaults to the network's public endpoint.
    #[serde(default)]
    pub ledger_url: Option<String>,

    /// Token sent to the ledger node, if it requires one.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Directory holding the session and simulated-claim database.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Encrypted keystore file of the local wallet.
    #[serde(default = "default_keystore")]
    pub keystore_path: PathBuf,

    /// Base URL of the claim page shared with attendees.
    #[serde(default)]
    pub claim_base_url: Option<String>,

    #[serde(default = "default_signing_timeout_secs")]
    pub signing_timeout_secs: u64,

    #[serde(default = "default_submission_timeout_secs")]
    pub submission_timeout_secs: u64,

    #[serde(default = "default_max_confirmation_rounds")]
    pub max_confirmation_rounds: u32,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_network() -> NetworkId {
    NetworkId::TestNet
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./chainbadge_data")
}

fn default_keystore() -> PathBuf {
    PathBuf::from("./chainbadge_data/wallet.json")
}

fn default_signing_timeout_secs() -> u64 {
    45
}

fn default_submission_timeout_secs() -> u64 {
    30
}

fn default_max_confirmation_rounds() -> u32 {
    10
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ClientConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// The ledger endpoint: the configured URL, else the network default.
    pub fn ledger_url(&self) -> &str {
        self.ledger_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_ledger_url())
    }

    pub fn issuance(&self) -> IssuanceConfig {
        IssuanceConfig {
            signing_timeout: Duration::from_secs(self.signing_timeout_secs),
            submission_timeout: Duration::from_secs(self.submission_timeout_secs),
            max_confirmation_rounds: self.max_confirmation_rounds,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            ledger_url: None,
            api_token: None,
            data_dir: default_data_dir(),
            keystore_path: default_keystore(),
            claim_base_url: None,
            signing_timeout_secs: default_signing_timeout_secs(),
            submission_timeout_secs: default_submission_timeout_secs(),
            max_confirmation_rounds: default_max_confirmation_rounds(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
