//! Asset transfers and opt-ins.

use chainbadge_types::{AssetId, WalletAddress};
use serde::{Deserialize, Serialize};

use crate::{SuggestedParams, Transaction, TransactionError, TxKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTransferFields {
    pub asset_id: AssetId,
    pub receiver: WalletAddress,
    pub amount: u64,
}

impl AssetTransferFields {
    /// A zero-amount transfer to oneself registers the account to hold the asset.
    pub fn is_opt_in(&self, sender: &WalletAddress) -> bool {
        self.amount == 0 && &self.receiver == sender
    }
}

/// Build a transfer of `amount` units of `asset_id` from `sender` to `receiver`.
pub fn build_asset_transfer(
    sender: WalletAddress,
    receiver: WalletAddress,
    asset_id: AssetId,
    amount: u64,
    params: &SuggestedParams,
) -> Result<Transaction, TransactionError> {
    if amount == 0 && sender != receiver {
        return Err(TransactionError::ZeroAmount);
    }
    if !chainbadge_crypto::validate_address(receiver.as_str()) {
        return Err(TransactionError::InvalidAddress(receiver.to_string()));
    }
    let fields = AssetTransferFields {
        asset_id,
        receiver,
        amount,
    };
    Transaction::with_params(sender, TxKind::AssetTransfer(fields), params)
}

/// Build the opt-in for `account` to receive `asset_id`.
pub fn build_opt_in(
    account: WalletAddress,
    asset_id: AssetId,
    params: &SuggestedParams,
) -> Result<Transaction, TransactionError> {
    build_asset_transfer(account.clone(), account, asset_id, 0, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{keypair, params};

    #[test]
    fn transfer_fields() {
        let (_, from) = keypair(1);
        let (_, to) = keypair(2);
        let txn = build_asset_transfer(from.clone(), to.clone(), 42, 1, &params()).unwrap();
        assert_eq!(txn.header.sender, from);
        match txn.kind {
            TxKind::AssetTransfer(fields) => {
                assert_eq!(fields.asset_id, 42);
                assert_eq!(fields.receiver, to);
                assert_eq!(fields.amount, 1);
                assert!(!fields.is_opt_in(&from));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn opt_in_is_zero_self_transfer() {
        let (_, me) = keypair(3);
        let txn = build_opt_in(me.clone(), 7, &params()).unwrap();
        match txn.kind {
            TxKind::AssetTransfer(fields) => assert!(fields.is_opt_in(&me)),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn zero_amount_to_other_rejected() {
        let (_, from) = keypair(1);
        let (_, to) = keypair(2);
        assert!(matches!(
            build_asset_transfer(from, to, 42, 0, &params()),
            Err(TransactionError::ZeroAmount)
        ));
    }

    #[test]
    fn malformed_receiver_rejected() {
        let (_, from) = keypair(1);
        assert!(matches!(
            build_asset_transfer(from, WalletAddress::new("nope"), 42, 1, &params()),
            Err(TransactionError::InvalidAddress(_))
        ));
    }
}
