//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbError, LmdbSessionStore, LmdbSimulatedBadgeStore};

/// Default map size: 64 MiB is far more than a session and a badge list need.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;
const MAX_DBS: u32 = 4;

const SESSION_DB: &str = "session";
const SIMULATED_DB: &str = "simulated_badges";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    session_db: Database<Str, Str>,
    simulated_db: Database<Str, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment in the directory `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path).map_err(|e| LmdbError::Io(e.to_string()))?;

        // SAFETY: the environment is opened once per directory by this process
        // and never concurrently re-opened with different options.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let session_db: Database<Str, Str> = env.create_database(&mut wtxn, Some(SESSION_DB))?;
        let simulated_db: Database<Str, Bytes> =
            env.create_database(&mut wtxn, Some(SIMULATED_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            session_db,
            simulated_db,
        })
    }

    /// Open with [`DEFAULT_MAP_SIZE`].
    pub fn open_default(path: &Path) -> Result<Self, LmdbError> {
        Self::open(path, DEFAULT_MAP_SIZE)
    }

    /// The persisted-session store backed by this environment.
    pub fn session_store(&self) -> LmdbSessionStore {
        LmdbSessionStore {
            env: Arc::clone(&self.env),
            session_db: self.session_db,
        }
    }

    /// The simulated-badge store backed by this environment.
    pub fn simulated_store(&self) -> LmdbSimulatedBadgeStore {
        LmdbSimulatedBadgeStore {
            env: Arc::clone(&self.env),
            simulated_db: self.simulated_db,
        }
    }
}
