//! Badge asset issuance.
//!
//! [`AssetIssuanceEngine`] drives one asset transaction at a time through
//! `Building -> AwaitingSignature -> Submitted -> Polling` to a terminal
//! `Confirmed`, `Failed` or `TimedOut`. Every wait is bounded: the wallet
//! signature by the signing timeout, the broadcast by the submission
//! timeout, confirmation by a maximum number of rounds. Nothing is retried
//! automatically.

pub mod config;
pub mod confirm;
pub mod engine;
pub mod error;

pub use config::IssuanceConfig;
pub use confirm::{wait_for_confirmation, PendingTransaction};
pub use engine::{AssetIssuanceEngine, IssuanceReceipt, IssuanceState, TransferOutcome};
pub use error::IssuanceError;
