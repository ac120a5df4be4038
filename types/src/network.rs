//! Network identifier.

use serde::{Deserialize, Serialize};

/// Identifies which ledger network the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The production network.
    MainNet,
    /// The public test network.
    TestNet,
    /// Local development network (sandbox node).
    Dev,
}

impl NetworkId {
    /// Default ledger endpoint for this network.
    pub fn default_ledger_url(&self) -> &'static str {
        match self {
            Self::MainNet => "https://mainnet-api.algonode.cloud",
            Self::TestNet => "https://testnet-api.algonode.cloud",
            Self::Dev => "http://127.0.0.1:4001",
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MainNet => "mainnet",
            Self::TestNet => "testnet",
            Self::Dev => "dev",
        }
    }

    /// Parse a network name; unknown names fall back to `Dev`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" | "live" => Self::MainNet,
            "testnet" | "test" => Self::TestNet,
            _ => Self::Dev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!(NetworkId::parse("TestNet"), NetworkId::TestNet);
        assert_eq!(NetworkId::parse("main"), NetworkId::MainNet);
        assert_eq!(NetworkId::parse("whatever"), NetworkId::Dev);
    }

    #[test]
    fn testnet_url() {
        assert!(NetworkId::TestNet.default_ledger_url().contains("testnet"));
    }
}
