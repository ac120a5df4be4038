//! Nullable stores: thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chainbadge_store::{SessionStore, SimulatedBadgeStore, StoreError};
use chainbadge_types::{BadgeOrigin, BadgeRecord, WalletAddress};

/// An in-memory session entry.
pub struct NullSessionStore {
    address: Mutex<Option<WalletAddress>>,
    fail_writes: AtomicBool,
}

impl NullSessionStore {
    pub fn new() -> Self {
        Self {
            address: Mutex::new(None),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// A store that already holds `address`, as after a restart.
    pub fn with_address(address: WalletAddress) -> Self {
        let store = Self::new();
        *store.address.lock().unwrap() = Some(address);
        store
    }

    /// Make every save and clear fail with a backend error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The persisted address (for assertions).
    pub fn persisted(&self) -> Option<WalletAddress> {
        self.address.lock().unwrap().clone()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("writes disabled".into()));
        }
        Ok(())
    }
}

impl Default for NullSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for NullSessionStore {
    fn load_address(&self) -> Result<Option<WalletAddress>, StoreError> {
        Ok(self.address.lock().unwrap().clone())
    }

    fn save_address(&self, address: &WalletAddress) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.address.lock().unwrap() = Some(address.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.check_writable()?;
        self.address.lock().unwrap().take();
        Ok(())
    }
}

/// An in-memory simulated-badge list per owner.
pub struct NullSimulatedBadgeStore {
    records: Mutex<HashMap<WalletAddress, Vec<BadgeRecord>>>,
    fail_reads: AtomicBool,
}

impl NullSimulatedBadgeStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Total records across all owners.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NullSimulatedBadgeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBadgeStore for NullSimulatedBadgeStore {
    fn append(&self, owner: &WalletAddress, record: &BadgeRecord) -> Result<(), StoreError> {
        if record.origin != BadgeOrigin::Simulated {
            return Err(StoreError::Rejected(format!(
                "asset {} is not a simulated badge",
                record.asset_id
            )));
        }
        self.records
            .lock()
            .unwrap()
            .entry(owner.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn list(&self, owner: &WalletAddress) -> Result<Vec<BadgeRecord>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("reads disabled".into()));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }
}
