//! A wallet provider backed by a local key.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chainbadge_crypto::{derive_address, keypair_from_private, sign_data, sign_transaction_bytes};
use chainbadge_transactions::{SignedTransaction, Transaction};
use chainbadge_types::{KeyPair, WalletAddress};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::error::{ProviderError, WalletError};
use crate::keystore::{decrypt_keystore, load_keystore};
use crate::provider::WalletProvider;

/// Signs with a key held in memory, approving every request immediately.
///
/// One pairing exists while the provider lives: `reconnect_session`
/// succeeds until `disconnect` tears it down, after which only a fresh
/// `connect` restores it. One signing request runs at a time; a second
/// concurrent request gets [`ProviderError::Busy`].
pub struct KeystoreWalletProvider {
    keypair: KeyPair,
    address: WalletAddress,
    connected: AtomicBool,
    torn_down: AtomicBool,
    signing: Mutex<()>,
    disconnects: broadcast::Sender<()>,
}

impl KeystoreWalletProvider {
    pub fn new(keypair: KeyPair) -> Self {
        let address = derive_address(&keypair.public);
        let (disconnects, _) = broadcast::channel(8);
        Self {
            keypair,
            address,
            connected: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
            signing: Mutex::new(()),
            disconnects,
        }
    }

    /// Load and decrypt the keystore at `path`.
    pub fn from_keystore(path: &Path, password: &str) -> Result<Self, WalletError> {
        let keystore = load_keystore(path)?;
        let private = decrypt_keystore(&keystore, password)?;
        let provider = Self::new(keypair_from_private(private));
        if provider.address != keystore.address {
            return Err(WalletError::Key(format!(
                "keystore address {} does not match its key",
                keystore.address
            )));
        }
        Ok(provider)
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    fn ensure_signer(&self, signer: &WalletAddress) -> Result<(), ProviderError> {
        if !self.is_connected() {
            return Err(ProviderError::NotConnected);
        }
        if signer != &self.address {
            debug!(signer = %signer, "refusing to sign for a foreign account");
            return Err(ProviderError::Rejected);
        }
        Ok(())
    }
}

#[async_trait]
impl WalletProvider for KeystoreWalletProvider {
    async fn connect(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        self.torn_down.store(false, Ordering::SeqCst);
        self.connected.store(true, Ordering::SeqCst);
        Ok(vec![self.address.clone()])
    }

    async fn reconnect_session(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        if self.torn_down.load(Ordering::SeqCst) {
            return Err(ProviderError::NotConnected);
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(vec![self.address.clone()])
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn sign_transaction(&self, txn: &Transaction) -> Result<Vec<u8>, ProviderError> {
        self.ensure_signer(txn.sender())?;
        let _gate = self.signing.try_lock().map_err(|_| ProviderError::Busy)?;

        let encoded = txn
            .encode()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let signature = sign_transaction_bytes(&encoded, &self.keypair.private);
        SignedTransaction::new(txn.clone(), signature)
            .encode()
            .map_err(|e| ProviderError::Transport(e.to_string()))
    }

    async fn sign_data(
        &self,
        data: &[u8],
        signer: &WalletAddress,
    ) -> Result<Vec<u8>, ProviderError> {
        self.ensure_signer(signer)?;
        let _gate = self.signing.try_lock().map_err(|_| ProviderError::Busy)?;
        Ok(sign_data(data, &self.keypair.private).0.to_vec())
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.connected.store(false, Ordering::SeqCst);
        self.torn_down.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe_disconnect(&self) -> broadcast::Receiver<()> {
        self.disconnects.subscribe()
    }
}
