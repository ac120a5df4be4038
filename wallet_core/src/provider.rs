//! The wallet provider boundary.

use async_trait::async_trait;
use chainbadge_transactions::Transaction;
use chainbadge_types::WalletAddress;
use tokio::sync::broadcast;

use crate::error::ProviderError;

/// An external wallet: pairing, user-approved signing and disconnect notices.
///
/// Signing calls are user-mediated and may never return; callers bound
/// them with their own timeouts.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Open a new connection; returns the accounts the user shared.
    async fn connect(&self) -> Result<Vec<WalletAddress>, ProviderError>;

    /// Resume an existing pairing without user interaction.
    async fn reconnect_session(&self) -> Result<Vec<WalletAddress>, ProviderError>;

    fn is_connected(&self) -> bool;

    /// Sign `txn`; returns the encoded signed transaction ready for submission.
    async fn sign_transaction(&self, txn: &Transaction) -> Result<Vec<u8>, ProviderError>;

    /// Sign arbitrary data as `signer`; returns the raw signature bytes.
    async fn sign_data(
        &self,
        data: &[u8],
        signer: &WalletAddress,
    ) -> Result<Vec<u8>, ProviderError>;

    async fn disconnect(&self) -> Result<(), ProviderError>;

    /// Notifications sent whenever the wallet drops the connection on its own.
    fn subscribe_disconnect(&self) -> broadcast::Receiver<()>;
}
