//! Stateless transaction validation.

use chainbadge_types::TypesError;

use crate::error::TransactionError;
use crate::{SignedTransaction, Transaction, TxKind};

/// Validate a transaction's structure: addresses, validity window and fee.
///
/// Stateful checks (balances, opt-in status, round bounds against the
/// current round) are the ledger's job.
pub fn validate_transaction(txn: &Transaction) -> Result<(), TransactionError> {
    let header = &txn.header;
    if !chainbadge_crypto::validate_address(header.sender.as_str()) {
        return Err(TransactionError::InvalidAddress(header.sender.to_string()));
    }
    if header.last_valid < header.first_valid {
        return Err(TransactionError::InvalidValidityWindow {
            first_valid: header.first_valid,
            last_valid: header.last_valid,
        });
    }

    match &txn.kind {
        TxKind::AssetCreate(fields) => {
            if fields.total != 1 {
                return Err(TypesError::InvalidTotal(fields.total).into());
            }
            if fields.decimals != 0 {
                return Err(TypesError::InvalidDecimals(fields.decimals).into());
            }
        }
        TxKind::AssetTransfer(fields) => {
            if !chainbadge_crypto::validate_address(fields.receiver.as_str()) {
                return Err(TransactionError::InvalidAddress(fields.receiver.to_string()));
            }
            if fields.amount == 0 && !fields.is_opt_in(&header.sender) {
                return Err(TransactionError::ZeroAmount);
            }
        }
    }
    Ok(())
}

/// Validate a signed transaction: structure plus signature by the sender.
pub fn validate_signed(signed: &SignedTransaction, min_fee: u64) -> Result<(), TransactionError> {
    validate_transaction(&signed.txn)?;
    if signed.txn.header.fee < min_fee {
        return Err(TransactionError::FeeTooLow {
            fee: signed.txn.header.fee,
            min_fee,
        });
    }
    if !signed.verify() {
        let tx_id = signed
            .id()
            .map(|id| id.to_string())
            .unwrap_or_else(|_| "<unencodable>".to_string());
        return Err(TransactionError::InvalidSignature { tx_id });
    }
    Ok(())
}
