//! Claim reconciliation.
//!
//! A wallet's badges come from two sources: assets it holds on the ledger
//! (`Real`) and claims fabricated locally for offline testing
//! (`Simulated`). [`ClaimReconciliation`] merges both into one set unique
//! by asset id, rebuilt from scratch on every pass.

pub mod error;
pub mod link;
pub mod reconcile;
pub mod simulate;

pub use error::ClaimsError;
pub use link::claim_url;
pub use reconcile::{ClaimReconciliation, OwnedBadges};
pub use simulate::{simulated_asset_id, SIMULATED_ID_FLOOR};
