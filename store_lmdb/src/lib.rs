//! LMDB storage backend for ChainBadge.
//!
//! Implements the storage traits from `chainbadge-store` using the `heed` LMDB
//! bindings. Each logical store maps to one named database within a single
//! environment.

pub mod environment;
pub mod error;
pub mod session;
pub mod simulated;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use session::LmdbSessionStore;
pub use simulated::LmdbSimulatedBadgeStore;
