//! Persisted wallet session.

use chainbadge_types::WalletAddress;

use crate::StoreError;

/// Fixed key under which the connected wallet address is persisted.
pub const SESSION_KEY: &str = "connected_wallet";

/// A single durable entry holding the connected wallet address.
///
/// Absence means "no session". Presence does not guarantee the wallet is
/// still connected; callers revalidate before trusting it for signing.
pub trait SessionStore: Send + Sync {
    /// Read the persisted address, if any.
    fn load_address(&self) -> Result<Option<WalletAddress>, StoreError>;

    /// Persist `address`, replacing any previous value.
    fn save_address(&self, address: &WalletAddress) -> Result<(), StoreError>;

    /// Remove the persisted address. Removing an absent entry is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}
