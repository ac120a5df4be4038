//! Local store of simulated badge claims.

use chainbadge_types::{BadgeRecord, WalletAddress};

use crate::StoreError;

/// Append-only list of simulated badges, keyed by the owning address.
///
/// Implementations refuse records whose origin is not `Simulated`.
pub trait SimulatedBadgeStore: Send + Sync {
    /// Append a record to `owner`'s list.
    fn append(&self, owner: &WalletAddress, record: &BadgeRecord) -> Result<(), StoreError>;

    /// All records for `owner`, in insertion order. Unknown owners yield an empty list.
    fn list(&self, owner: &WalletAddress) -> Result<Vec<BadgeRecord>, StoreError>;
}
