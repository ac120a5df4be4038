//! LMDB implementation of SimulatedBadgeStore.
//!
//! One entry per owner address; the value is the bincode-encoded list of
//! that owner's records. Appends are read-modify-write inside a single
//! write transaction.

use std::sync::Arc;

use heed::types::Bytes;
use heed::types::Str;
use heed::{Database, Env};

use chainbadge_store::{SimulatedBadgeStore, StoreError};
use chainbadge_types::{BadgeOrigin, BadgeRecord, WalletAddress};

use crate::LmdbError;

pub struct LmdbSimulatedBadgeStore {
    pub(crate) env: Arc<Env>,
    pub(crate) simulated_db: Database<Str, Bytes>,
}

fn decode(bytes: &[u8]) -> Result<Vec<BadgeRecord>, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| LmdbError::Serialization(e.to_string()))
}

impl SimulatedBadgeStore for LmdbSimulatedBadgeStore {
    fn append(&self, owner: &WalletAddress, record: &BadgeRecord) -> Result<(), StoreError> {
        if record.origin != BadgeOrigin::Simulated {
            return Err(StoreError::Rejected(format!(
                "asset {} is not a simulated badge",
                record.asset_id
            )));
        }

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let mut records = match self
            .simulated_db
            .get(&wtxn, owner.as_str())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => decode(bytes)?,
            None => Vec::new(),
        };
        records.push(record.clone());

        let encoded =
            bincode::serialize(&records).map_err(|e| LmdbError::Serialization(e.to_string()))?;
        self.simulated_db
            .put(&mut wtxn, owner.as_str(), &encoded)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::debug!(owner = %owner, asset_id = record.asset_id, "recorded simulated badge");
        Ok(())
    }

    fn list(&self, owner: &WalletAddress) -> Result<Vec<BadgeRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .simulated_db
            .get(&rtxn, owner.as_str())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(decode(bytes)?),
            None => Ok(Vec::new()),
        }
    }
}
