//! Abstract storage traits for ChainBadge.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The session manager and claim reconciliation depend only on the
//! traits, never on a concrete backend.

pub mod error;
pub mod session;
pub mod simulated;

pub use error::StoreError;
pub use session::{SessionStore, SESSION_KEY};
pub use simulated::SimulatedBadgeStore;
