//! The process-wide wallet session.
//!
//! [`WalletSessionManager`] owns the single [`WalletSession`]: it connects
//! through the injected [`WalletProvider`], persists the address through a
//! [`SessionStore`], resumes a dormant pairing once when asked to prove
//! liveness, and clears everything on disconnect.
//!
//! Provider disconnect notices arrive out of band. A listener task spawned
//! on every successful connect clears the session exactly as
//! [`WalletSessionManager::disconnect`] does. Other components re-read the
//! session through [`WalletSessionManager::is_live_for`] between steps
//! instead of caching it.

use std::sync::{Arc, Mutex, MutexGuard};

use chainbadge_store::SessionStore;
use chainbadge_types::{Timestamp, WalletAddress, WalletSession};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ConnectionError;
use crate::provider::WalletProvider;

type SharedSession = Arc<Mutex<Option<WalletSession>>>;

pub struct WalletSessionManager {
    provider: Arc<dyn WalletProvider>,
    store: Arc<dyn SessionStore>,
    session: SharedSession,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl WalletSessionManager {
    pub fn new(provider: Arc<dyn WalletProvider>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            provider,
            store,
            session: Arc::new(Mutex::new(None)),
            listener: Mutex::new(None),
        }
    }

    /// The provider signing requests go through.
    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }

    /// Open a connection and make its first account the session address.
    pub async fn connect(&self) -> Result<WalletSession, ConnectionError> {
        info!("connecting wallet");
        let accounts = self.provider.connect().await.map_err(|e| {
            warn!(error = %e, "wallet connection failed");
            ConnectionError::from(e)
        })?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or(ConnectionError::NoAccounts)?;

        self.store.save_address(&address)?;
        let session = WalletSession::new(address.clone(), Timestamp::now());
        *lock(&self.session) = Some(session.clone());
        self.spawn_listener();

        info!(address = %address, "wallet connected");
        Ok(session)
    }

    /// The session address, falling back to the persisted one.
    ///
    /// A persisted address is loaded as an inactive session; it is not
    /// trusted for signing until [`verify_liveness`](Self::verify_liveness)
    /// succeeds.
    pub fn active_address(&self) -> Option<WalletAddress> {
        if let Some(session) = lock(&self.session).as_ref() {
            return Some(session.address.clone());
        }

        let persisted = match self.store.load_address() {
            Ok(persisted) => persisted?,
            Err(e) => {
                warn!(error = %e, "failed to read persisted session");
                return None;
            }
        };

        let mut guard = lock(&self.session);
        // A concurrent connect may have won the race.
        if let Some(session) = guard.as_ref() {
            return Some(session.address.clone());
        }
        debug!(address = %persisted, "rehydrated persisted session");
        *guard = Some(WalletSession::rehydrated(persisted.clone(), Timestamp::now()));
        Some(persisted)
    }

    /// Whether the session is backed by a live provider connection.
    ///
    /// When the provider reports inactive, one silent resume is attempted.
    /// `false` means the user must connect again; it is never an error.
    pub async fn verify_liveness(&self) -> bool {
        let Some(address) = self.active_address() else {
            return false;
        };

        let active = lock(&self.session)
            .as_ref()
            .is_some_and(|s| s.is_active && s.address == address);
        if active && self.provider.is_connected() {
            return true;
        }

        debug!(address = %address, "resuming wallet session");
        match self.provider.reconnect_session().await {
            Ok(accounts) if accounts.contains(&address) => {
                {
                    let mut guard = lock(&self.session);
                    match guard.as_mut() {
                        Some(session) if session.address == address => session.is_active = true,
                        // Disconnected or replaced while resuming.
                        _ => return false,
                    }
                }
                self.spawn_listener();
                info!(address = %address, "wallet session resumed");
                true
            }
            Ok(_) => {
                warn!(address = %address, "resumed wallet no longer holds the session account");
                self.mark_inactive();
                false
            }
            Err(e) => {
                info!(address = %address, error = %e, "wallet session could not be resumed");
                self.mark_inactive();
                false
            }
        }
    }

    /// Tear down the connection and forget the session. Never fails.
    pub async fn disconnect(&self) {
        if let Some(handle) = lock(&self.listener).take() {
            handle.abort();
        }
        if let Err(e) = self.provider.disconnect().await {
            debug!(error = %e, "provider teardown failed");
        }
        clear_session(&self.session, self.store.as_ref());
        info!("wallet disconnected");
    }

    pub fn current_session(&self) -> Option<WalletSession> {
        lock(&self.session).clone()
    }

    /// Whether `address` still holds the active session.
    pub fn is_session_for(&self, address: &WalletAddress) -> bool {
        lock(&self.session)
            .as_ref()
            .is_some_and(|s| s.is_active && &s.address == address)
    }

    /// [`is_session_for`](Self::is_session_for), and the provider still
    /// reports a connection. A drop the listener has not yet seen counts.
    pub fn is_live_for(&self, address: &WalletAddress) -> bool {
        self.provider.is_connected() && self.is_session_for(address)
    }

    fn mark_inactive(&self) {
        if let Some(session) = lock(&self.session).as_mut() {
            session.is_active = false;
        }
    }

    fn spawn_listener(&self) {
        let mut events = self.provider.subscribe_disconnect();
        let session = Arc::clone(&self.session);
        let store = Arc::clone(&self.store);

        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        info!("wallet reported disconnect");
                        clear_session(&session, store.as_ref());
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        if let Some(previous) = lock(&self.listener).replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for WalletSessionManager {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.listener).take() {
            handle.abort();
        }
    }
}

fn clear_session(session: &Mutex<Option<WalletSession>>, store: &dyn SessionStore) {
    lock(session).take();
    if let Err(e) = store.clear() {
        warn!(error = %e, "failed to clear persisted session");
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
