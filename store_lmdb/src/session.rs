//! LMDB implementation of SessionStore.

use std::sync::Arc;

use heed::types::Str;
use heed::{Database, Env};

use chainbadge_store::{SessionStore, StoreError, SESSION_KEY};
use chainbadge_types::WalletAddress;

use crate::LmdbError;

pub struct LmdbSessionStore {
    pub(crate) env: Arc<Env>,
    pub(crate) session_db: Database<Str, Str>,
}

impl SessionStore for LmdbSessionStore {
    fn load_address(&self) -> Result<Option<WalletAddress>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .session_db
            .get(&rtxn, SESSION_KEY)
            .map_err(LmdbError::from)?;
        Ok(val.map(WalletAddress::from))
    }

    fn save_address(&self, address: &WalletAddress) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.session_db
            .put(&mut wtxn, SESSION_KEY, address.as_str())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.session_db
            .delete(&mut wtxn, SESSION_KEY)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;

    fn addr(c: char) -> WalletAddress {
        WalletAddress::new(c.to_string().repeat(58))
    }

    #[test]
    fn empty_store_has_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open_default(dir.path()).unwrap();
        assert_eq!(env.session_store().load_address().unwrap(), None);
    }

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open_default(dir.path()).unwrap();
        let store = env.session_store();

        store.save_address(&addr('A')).unwrap();
        assert_eq!(store.load_address().unwrap(), Some(addr('A')));

        store.save_address(&addr('B')).unwrap();
        assert_eq!(store.load_address().unwrap(), Some(addr('B')));

        store.clear().unwrap();
        assert_eq!(store.load_address().unwrap(), None);
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open_default(dir.path()).unwrap();
            env.session_store().save_address(&addr('C')).unwrap();
        }
        let env = LmdbEnvironment::open_default(dir.path()).unwrap();
        assert_eq!(env.session_store().load_address().unwrap(), Some(addr('C')));
    }
}
