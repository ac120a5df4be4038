//! Nullable infrastructure for deterministic testing.
//!
//! Every external boundary of the wallet core (wallet provider, ledger,
//! session store, simulated-badge store) has an in-memory stand-in here that:
//! - Returns deterministic values
//! - Can be steered programmatically (sign outcomes, confirmation timing, failures)
//! - Records what it was asked to do, for assertions
//! - Never touches the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod ledger;
pub mod provider;
pub mod store;

pub use ledger::NullLedger;
pub use provider::{ConnectMode, NullWalletProvider, SignMode};
pub use store::{NullSessionStore, NullSimulatedBadgeStore};
