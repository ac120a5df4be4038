//! The ledger boundary.
//!
//! Everything the wallet core needs from the chain goes through [`Ledger`]:
//! network parameters, balances, holdings and asset lookups, pending transaction
//! status, round tracking and one write (`submit_signed_transaction`).
//! No call has a latency bound; callers impose their own timeouts.

pub mod error;
pub mod http;

use async_trait::async_trait;
use chainbadge_transactions::{SuggestedParams, TxId};
use chainbadge_types::{AssetId, WalletAddress};
use serde::{Deserialize, Serialize};

pub use error::LedgerError;
pub use http::HttpLedgerClient;

/// One asset balance held by an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHolding {
    pub asset_id: AssetId,
    pub amount: u64,
}

/// An account's native balance and asset holdings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: WalletAddress,
    /// Native balance in micro-units.
    pub amount: u64,
    pub holdings: Vec<AssetHolding>,
}

/// Descriptive parameters of an asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub asset_id: AssetId,
    pub name: String,
    pub unit_name: String,
    pub url: String,
    pub total: u64,
    pub decimals: u32,
    pub creator: WalletAddress,
}

/// What the ledger knows about a submitted transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingStatus {
    pub confirmed_round: Option<u64>,
    /// Set on confirmed asset creations.
    pub asset_index: Option<AssetId>,
    /// Non-empty when the pool dropped the transaction.
    pub pool_error: String,
}

impl PendingStatus {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_round.is_some_and(|round| round > 0)
    }

    pub fn is_rejected(&self) -> bool {
        !self.pool_error.is_empty()
    }
}

#[async_trait]
pub trait Ledger: Send + Sync {
    async fn network_params(&self) -> Result<SuggestedParams, LedgerError>;

    async fn account_info(&self, address: &WalletAddress) -> Result<AccountInfo, LedgerError>;

    async fn account_holdings(
        &self,
        address: &WalletAddress,
    ) -> Result<Vec<AssetHolding>, LedgerError> {
        Ok(self.account_info(address).await?.holdings)
    }

    async fn asset_by_id(&self, asset_id: AssetId) -> Result<AssetInfo, LedgerError>;

    async fn pending_transaction_status(&self, tx_id: &TxId)
        -> Result<PendingStatus, LedgerError>;

    async fn current_round(&self) -> Result<u64, LedgerError>;

    /// Block until the ledger has passed `round`; returns the new last round.
    async fn wait_for_round(&self, round: u64) -> Result<u64, LedgerError>;

    async fn submit_signed_transaction(&self, bytes: &[u8]) -> Result<TxId, LedgerError>;
}
