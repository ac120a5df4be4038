//! Wallet session record.

use serde::{Deserialize, Serialize};

use crate::{Timestamp, WalletAddress};

/// The single process-wide wallet connection.
///
/// Created on a successful connect and invalidated on disconnect. The
/// persisted copy of `address` is advisory only: it must be revalidated
/// against the live provider before being trusted for signing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    pub address: WalletAddress,
    pub connected_at: Timestamp,
    pub is_active: bool,
}

impl WalletSession {
    pub fn new(address: WalletAddress, connected_at: Timestamp) -> Self {
        Self {
            address,
            connected_at,
            is_active: true,
        }
    }

    /// A session rebuilt from persisted storage; not yet backed by a live connection.
    pub fn rehydrated(address: WalletAddress, now: Timestamp) -> Self {
        Self {
            address,
            connected_at: now,
            is_active: false,
        }
    }
}
