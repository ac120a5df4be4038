//! Merging ledger holdings with simulated claims.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use chainbadge_ledger::{Ledger, LedgerError};
use chainbadge_store::{SimulatedBadgeStore, StoreError};
use chainbadge_types::{AssetId, BadgeOrigin, BadgeRecord, Timestamp, WalletAddress};
use tracing::{debug, info, warn};

use crate::error::ClaimsError;
use crate::simulate::simulated_asset_id;

pub struct ClaimReconciliation {
    ledger: Arc<dyn Ledger>,
    simulated: Arc<dyn SimulatedBadgeStore>,
}

impl ClaimReconciliation {
    pub fn new(ledger: Arc<dyn Ledger>, simulated: Arc<dyn SimulatedBadgeStore>) -> Self {
        Self { ledger, simulated }
    }

    /// Every badge `owner` holds: ledger assets with a positive balance,
    /// then simulated claims, each asset id at most once.
    ///
    /// Nothing is fetched until the first pull.
    pub fn list_owned_badges(&self, owner: &WalletAddress) -> OwnedBadges {
        OwnedBadges {
            ledger: Arc::clone(&self.ledger),
            store: Arc::clone(&self.simulated),
            owner: owner.clone(),
            phase: Phase::Start,
            holdings: VecDeque::new(),
            simulated: VecDeque::new(),
            seen: HashSet::new(),
            ledger_error: None,
            store_error: None,
        }
    }

    /// Append a simulated claim for `owner`.
    pub fn record_simulated_claim(
        &self,
        owner: &WalletAddress,
        record: &BadgeRecord,
    ) -> Result<(), ClaimsError> {
        if record.origin != BadgeOrigin::Simulated {
            return Err(ClaimsError::NotSimulated(record.asset_id));
        }
        self.simulated.append(owner, record)?;
        debug!(owner = %owner, asset_id = record.asset_id, "simulated claim recorded");
        Ok(())
    }

    /// Fabricate and record a simulated badge for `owner`.
    pub fn simulate_claim(
        &self,
        owner: &WalletAddress,
        event: &str,
        badge_type: &str,
    ) -> Result<BadgeRecord, ClaimsError> {
        let record = BadgeRecord::simulated(
            simulated_asset_id(),
            format!("{event} - {badge_type} Badge"),
            chainbadge_types::asset::BADGE_UNIT_NAME,
            owner.clone(),
            Timestamp::now(),
        );
        self.record_simulated_claim(owner, &record)?;
        info!(owner = %owner, asset_id = record.asset_id, "simulated badge claimed");
        Ok(record)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Start,
    Merging,
    Done,
}

/// A single-pass cursor over an owner's badges.
///
/// Each ledger badge costs one asset lookup when pulled. The cursor cannot
/// be rewound; collect it to iterate more than once. A failed holdings
/// query leaves only the simulated records (see [`ledger_error`]); a failed
/// lookup skips that one asset.
///
/// [`ledger_error`]: OwnedBadges::ledger_error
pub struct OwnedBadges {
    ledger: Arc<dyn Ledger>,
    store: Arc<dyn SimulatedBadgeStore>,
    owner: WalletAddress,
    phase: Phase,
    holdings: VecDeque<AssetId>,
    simulated: VecDeque<BadgeRecord>,
    seen: HashSet<AssetId>,
    ledger_error: Option<LedgerError>,
    store_error: Option<StoreError>,
}

impl OwnedBadges {
    pub async fn next(&mut self) -> Option<BadgeRecord> {
        if self.phase == Phase::Start {
            self.load().await;
            self.phase = Phase::Merging;
        }
        if self.phase == Phase::Done {
            return None;
        }

        while let Some(asset_id) = self.holdings.pop_front() {
            if self.seen.contains(&asset_id) {
                continue;
            }
            match self.ledger.asset_by_id(asset_id).await {
                Ok(info) => {
                    self.seen.insert(asset_id);
                    return Some(
                        BadgeRecord::real(asset_id, info.name, info.unit_name, info.creator)
                            .with_url(info.url),
                    );
                }
                Err(e) => warn!(asset_id, error = %e, "skipping asset whose lookup failed"),
            }
        }

        // Ledger records are exhausted, so `seen` is complete: a simulated
        // record colliding with a real one is dropped here.
        while let Some(record) = self.simulated.pop_front() {
            if self.seen.insert(record.asset_id) {
                return Some(record);
            }
            debug!(asset_id = record.asset_id, "dropping duplicate simulated badge");
        }

        self.phase = Phase::Done;
        None
    }

    /// Drain the rest of the cursor. Error accessors stay usable afterwards.
    pub async fn drain(&mut self) -> Vec<BadgeRecord> {
        let mut badges = Vec::new();
        while let Some(badge) = self.next().await {
            badges.push(badge);
        }
        badges
    }

    pub async fn collect_all(mut self) -> Vec<BadgeRecord> {
        self.drain().await
    }

    /// Why ledger records are missing, if the holdings query failed.
    pub fn ledger_error(&self) -> Option<&LedgerError> {
        self.ledger_error.as_ref()
    }

    /// Why simulated records are missing, if the local store failed.
    pub fn store_error(&self) -> Option<&StoreError> {
        self.store_error.as_ref()
    }

    async fn load(&mut self) {
        match self.ledger.account_holdings(&self.owner).await {
            Ok(holdings) => {
                self.holdings = holdings
                    .into_iter()
                    .filter(|h| h.amount > 0)
                    .map(|h| h.asset_id)
                    .collect();
            }
            Err(e) => {
                warn!(owner = %self.owner, error = %e, "holdings unavailable; showing simulated badges only");
                self.ledger_error = Some(e);
            }
        }

        match self.store.list(&self.owner) {
            Ok(records) => {
                self.simulated = records
                    .into_iter()
                    .filter(|r| r.origin == BadgeOrigin::Simulated)
                    .collect();
            }
            Err(e) => {
                warn!(owner = %self.owner, error = %e, "simulated badges unavailable");
                self.store_error = Some(e);
            }
        }
    }
}
