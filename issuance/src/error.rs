use chainbadge_ledger::LedgerError;
use chainbadge_transactions::{TransactionError, TxId};
use chainbadge_wallet_core::ProviderError;
use thiserror::Error;

/// Why an issuance cycle did not reach confirmation.
///
/// Timeouts and rejections are kept apart because the caller's recovery
/// differs: reconnect after a signing timeout, give up after a rejection.
#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("wallet session expired; reconnect the wallet")]
    SessionExpired,

    #[error("wallet did not sign in time")]
    SigningTimeout,

    #[error("signature request rejected")]
    SigningRejected,

    #[error("submission timed out; the transaction may still be broadcast")]
    SubmissionTimeout,

    /// The transaction may still confirm later; its outcome is unknown.
    #[error("transaction {tx_id} not confirmed after {rounds} rounds")]
    ConfirmationTimeout { tx_id: TxId, rounds: u32 },

    #[error("transaction rejected: {reason}")]
    Rejected { reason: String },

    #[error("wallet is busy signing another transaction")]
    ProviderBusy,

    #[error("stopped waiting for transaction {tx_id}")]
    Cancelled { tx_id: TxId },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("wallet provider error: {0}")]
    Provider(ProviderError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl From<TransactionError> for IssuanceError {
    fn from(e: TransactionError) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}

impl From<ProviderError> for IssuanceError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Rejected => Self::SigningRejected,
            ProviderError::Timeout => Self::SigningTimeout,
            ProviderError::Busy => Self::ProviderBusy,
            ProviderError::NotConnected => Self::SessionExpired,
            other => Self::Provider(other),
        }
    }
}
