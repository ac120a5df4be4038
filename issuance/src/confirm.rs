//! Bounded confirmation polling.

use chainbadge_ledger::{Ledger, LedgerError, PendingStatus};
use chainbadge_transactions::TxId;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::IssuanceError;

/// A submitted transaction being watched for confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTransaction {
    pub tx_id: TxId,
    pub submitted_at_round: u64,
    pub rounds_waited: u32,
}

impl PendingTransaction {
    pub fn new(tx_id: TxId, submitted_at_round: u64) -> Self {
        Self {
            tx_id,
            submitted_at_round,
            rounds_waited: 0,
        }
    }
}

/// Poll `pending` once per round, at most `max_rounds` times.
///
/// Returns the confirmed status, `Rejected` on a pool error, `Cancelled`
/// once `cancel` turns true, or `ConfirmationTimeout` when the bound is
/// reached. A missing entry or a transport hiccup counts as "not yet".
/// Cancelling only stops the polling; the transaction stays submitted.
pub async fn wait_for_confirmation(
    ledger: &dyn Ledger,
    pending: &mut PendingTransaction,
    max_rounds: u32,
    cancel: &mut watch::Receiver<bool>,
) -> Result<PendingStatus, IssuanceError> {
    let mut round = pending.submitted_at_round;

    while pending.rounds_waited < max_rounds {
        if *cancel.borrow_and_update() {
            return Err(cancelled(pending));
        }

        match ledger.pending_transaction_status(&pending.tx_id).await {
            Ok(status) if status.is_rejected() => {
                warn!(tx_id = %pending.tx_id, reason = %status.pool_error, "transaction dropped from pool");
                return Err(IssuanceError::Rejected {
                    reason: status.pool_error,
                });
            }
            Ok(status) if status.is_confirmed() => {
                debug!(tx_id = %pending.tx_id, round = ?status.confirmed_round, "transaction confirmed");
                return Ok(status);
            }
            Ok(_) => {}
            Err(e @ LedgerError::NotFound(_)) => {
                debug!(tx_id = %pending.tx_id, error = %e, "transaction not visible yet");
            }
            Err(e) if e.is_transient() => {
                warn!(tx_id = %pending.tx_id, error = %e, "status poll failed");
            }
            Err(e) => return Err(e.into()),
        }

        pending.rounds_waited += 1;
        if pending.rounds_waited >= max_rounds {
            break;
        }

        tokio::select! {
            next = ledger.wait_for_round(round) => match next {
                Ok(next) => round = next,
                Err(e) if e.is_transient() => {
                    warn!(tx_id = %pending.tx_id, error = %e, "round wait failed");
                    round += 1;
                }
                Err(e) => return Err(e.into()),
            },
            _ = cancellation(cancel) => return Err(cancelled(pending)),
        }
    }

    Err(IssuanceError::ConfirmationTimeout {
        tx_id: pending.tx_id.clone(),
        rounds: pending.rounds_waited,
    })
}

fn cancelled(pending: &PendingTransaction) -> IssuanceError {
    debug!(tx_id = %pending.tx_id, "confirmation polling cancelled");
    IssuanceError::Cancelled {
        tx_id: pending.tx_id.clone(),
    }
}

/// Resolves once `cancel` reads true. A dropped sender never cancels.
async fn cancellation(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
