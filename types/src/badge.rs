//! Badge records as shown to a holder.

use serde::{Deserialize, Serialize};

use crate::{AssetId, Timestamp, WalletAddress};

/// Where a badge record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeOrigin {
    /// Read from the ledger.
    Real,
    /// Fabricated locally for offline testing. Never on the ledger.
    Simulated,
}

/// A badge held by an address. Unique by `asset_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRecord {
    pub asset_id: AssetId,
    pub name: String,
    pub unit_name: String,
    pub creator: WalletAddress,
    pub origin: BadgeOrigin,
    #[serde(default)]
    pub url: Option<String>,
    /// When a simulated claim was recorded.
    #[serde(default)]
    pub claimed_at: Option<Timestamp>,
}

impl BadgeRecord {
    pub fn real(
        asset_id: AssetId,
        name: impl Into<String>,
        unit_name: impl Into<String>,
        creator: WalletAddress,
    ) -> Self {
        Self {
            asset_id,
            name: name.into(),
            unit_name: unit_name.into(),
            creator,
            origin: BadgeOrigin::Real,
            url: None,
            claimed_at: None,
        }
    }

    pub fn simulated(
        asset_id: AssetId,
        name: impl Into<String>,
        unit_name: impl Into<String>,
        creator: WalletAddress,
        claimed_at: Timestamp,
    ) -> Self {
        Self {
            asset_id,
            name: name.into(),
            unit_name: unit_name.into(),
            creator,
            origin: BadgeOrigin::Simulated,
            url: None,
            claimed_at: Some(claimed_at),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.url = if url.is_empty() { None } else { Some(url) };
        self
    }

    pub fn is_real(&self) -> bool {
        self.origin == BadgeOrigin::Real
    }
}
