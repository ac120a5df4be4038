//! Nullable wallet provider: a scriptable wallet for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chainbadge_crypto::{derive_address, keypair_from_seed, sign_data, sign_transaction_bytes};
use chainbadge_transactions::{SignedTransaction, Transaction};
use chainbadge_types::{KeyPair, WalletAddress};
use chainbadge_wallet_core::{ProviderError, WalletProvider};
use tokio::sync::broadcast;

/// How the wallet answers signing requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignMode {
    /// Approve immediately with a valid signature.
    Instant,
    /// Never answer.
    Never,
    /// The user declines.
    Reject,
    /// The wallet reports another request in flight.
    Busy,
    /// The wallet gives up waiting for the user.
    Timeout,
}

/// How the wallet answers a connection handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectMode {
    Accept,
    NoAccounts,
    Reject,
}

/// A wallet holding one deterministic key.
pub struct NullWalletProvider {
    keypair: KeyPair,
    address: WalletAddress,
    connected: AtomicBool,
    resumable: AtomicBool,
    fail_disconnect: AtomicBool,
    disconnect_on_sign: AtomicBool,
    sign_mode: Mutex<SignMode>,
    sign_budget: Mutex<Option<usize>>,
    connect_mode: Mutex<ConnectMode>,
    sign_calls: AtomicUsize,
    connect_calls: AtomicUsize,
    reconnect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    disconnects: broadcast::Sender<()>,
}

impl NullWalletProvider {
    /// A wallet whose key is derived from `seed`.
    pub fn new(seed: u8) -> Self {
        let keypair = keypair_from_seed(&[seed; 32]);
        let address = derive_address(&keypair.public);
        let (disconnects, _) = broadcast::channel(8);
        Self {
            keypair,
            address,
            connected: AtomicBool::new(false),
            resumable: AtomicBool::new(true),
            fail_disconnect: AtomicBool::new(false),
            disconnect_on_sign: AtomicBool::new(false),
            sign_mode: Mutex::new(SignMode::Instant),
            sign_budget: Mutex::new(None),
            connect_mode: Mutex::new(ConnectMode::Accept),
            sign_calls: AtomicUsize::new(0),
            connect_calls: AtomicUsize::new(0),
            reconnect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            disconnects,
        }
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    pub fn set_sign_mode(&self, mode: SignMode) {
        *self.sign_mode.lock().unwrap() = mode;
    }

    /// Approve only the next `n` requests; later ones are declined.
    pub fn set_sign_budget(&self, n: Option<usize>) {
        *self.sign_budget.lock().unwrap() = n;
    }

    pub fn set_connect_mode(&self, mode: ConnectMode) {
        *self.connect_mode.lock().unwrap() = mode;
    }

    /// Whether `reconnect_session` can resume the pairing.
    pub fn set_resumable(&self, resumable: bool) {
        self.resumable.store(resumable, Ordering::SeqCst);
    }

    /// Make `disconnect` report a teardown failure.
    pub fn set_fail_disconnect(&self, fail: bool) {
        self.fail_disconnect.store(fail, Ordering::SeqCst);
    }

    /// Approve the next request, then drop the connection and notify
    /// subscribers before the answer is returned.
    pub fn set_disconnect_on_sign(&self, disconnect: bool) {
        self.disconnect_on_sign.store(disconnect, Ordering::SeqCst);
    }

    /// Drop the connection silently, as when the app is backgrounded.
    pub fn go_dormant(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Drop the connection and notify subscribers, as when the user
    /// disconnects from the wallet app.
    pub fn emit_disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        let _ = self.disconnects.send(());
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn reconnect_calls(&self) -> usize {
        self.reconnect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    async fn answer<T>(&self, approve: impl FnOnce() -> T) -> Result<T, ProviderError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if !self.connected.load(Ordering::SeqCst) {
            return Err(ProviderError::NotConnected);
        }
        let mode = *self.sign_mode.lock().unwrap();
        if mode == SignMode::Instant {
            let mut budget = self.sign_budget.lock().unwrap();
            match budget.as_mut() {
                Some(0) => return Err(ProviderError::Rejected),
                Some(n) => *n -= 1,
                None => {}
            }
        }
        match mode {
            SignMode::Instant => {
                let answer = approve();
                if self.disconnect_on_sign.swap(false, Ordering::SeqCst) {
                    self.emit_disconnect();
                }
                Ok(answer)
            }
            SignMode::Never => std::future::pending().await,
            SignMode::Reject => Err(ProviderError::Rejected),
            SignMode::Busy => Err(ProviderError::Busy),
            SignMode::Timeout => Err(ProviderError::Timeout),
        }
    }
}

#[async_trait]
impl WalletProvider for NullWalletProvider {
    async fn connect(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        let mode = *self.connect_mode.lock().unwrap();
        match mode {
            ConnectMode::Accept => {
                self.connected.store(true, Ordering::SeqCst);
                self.resumable.store(true, Ordering::SeqCst);
                Ok(vec![self.address.clone()])
            }
            ConnectMode::NoAccounts => Ok(Vec::new()),
            ConnectMode::Reject => Err(ProviderError::Rejected),
        }
    }

    async fn reconnect_session(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        self.reconnect_calls.fetch_add(1, Ordering::SeqCst);
        if !self.resumable.load(Ordering::SeqCst) {
            return Err(ProviderError::NotConnected);
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(vec![self.address.clone()])
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn sign_transaction(&self, txn: &Transaction) -> Result<Vec<u8>, ProviderError> {
        let encoded = txn
            .encode()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let signature = self
            .answer(|| sign_transaction_bytes(&encoded, &self.keypair.private))
            .await?;
        SignedTransaction::new(txn.clone(), signature)
            .encode()
            .map_err(|e| ProviderError::Transport(e.to_string()))
    }

    async fn sign_data(
        &self,
        data: &[u8],
        _signer: &WalletAddress,
    ) -> Result<Vec<u8>, ProviderError> {
        self.answer(|| sign_data(data, &self.keypair.private).0.to_vec())
            .await
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        self.resumable.store(false, Ordering::SeqCst);
        if self.fail_disconnect.load(Ordering::SeqCst) {
            return Err(ProviderError::Transport("bridge unreachable".into()));
        }
        Ok(())
    }

    fn subscribe_disconnect(&self) -> broadcast::Receiver<()> {
        self.disconnects.subscribe()
    }
}
