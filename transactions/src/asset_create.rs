//! Asset creation: mint a single-unit badge.

use chainbadge_types::{AssetCreationRequest, WalletAddress};
use serde::{Deserialize, Serialize};

use crate::{SuggestedParams, Transaction, TransactionError, TxKind};

/// Parameters of the asset being created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCreateFields {
    pub total: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub unit_name: String,
    pub asset_name: String,
    pub url: String,
    /// Account allowed to reconfigure or destroy the asset.
    pub manager: Option<WalletAddress>,
    pub reserve: Option<WalletAddress>,
    pub freeze: Option<WalletAddress>,
    pub clawback: Option<WalletAddress>,
}

/// Build the unsigned creation transaction for `request`.
///
/// The creator becomes sender and manager; no reserve, freeze or clawback
/// accounts are set, so a badge can never be frozen or taken back.
pub fn build_asset_create(
    request: &AssetCreationRequest,
    params: &SuggestedParams,
) -> Result<Transaction, TransactionError> {
    request.validate()?;

    let fields = AssetCreateFields {
        total: request.total_units,
        decimals: request.decimals,
        default_frozen: false,
        unit_name: request.unit_name.clone(),
        asset_name: request.name.clone(),
        url: request.metadata_url.clone(),
        manager: Some(request.creator.clone()),
        reserve: None,
        freeze: None,
        clawback: None,
    };

    Transaction::with_params(request.creator.clone(), TxKind::AssetCreate(fields), params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{keypair, params};

    #[test]
    fn creation_carries_request_fields() {
        let (_, creator) = keypair(1);
        let req = AssetCreationRequest::badge("Conf2024", "Participant", creator.clone());
        let txn = build_asset_create(&req, &params()).unwrap();

        assert_eq!(txn.header.sender, creator);
        assert_eq!(txn.header.first_valid, 100);
        assert_eq!(txn.header.last_valid, 1_100);
        assert_eq!(txn.header.fee, 1_000);
        match txn.kind {
            TxKind::AssetCreate(fields) => {
                assert_eq!(fields.total, 1);
                assert_eq!(fields.decimals, 0);
                assert_eq!(fields.asset_name, "Conf2024 - Participant Badge");
                assert_eq!(fields.unit_name, "BADGE");
                assert_eq!(fields.manager, Some(creator));
                assert!(fields.clawback.is_none());
                assert!(!fields.default_frozen);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn build_is_pure() {
        let (_, creator) = keypair(2);
        let req = AssetCreationRequest::badge("Conf2024", "Speaker", creator);
        let a = build_asset_create(&req, &params()).unwrap();
        let b = build_asset_create(&req, &params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_request_rejected() {
        let (_, creator) = keypair(1);
        let mut req = AssetCreationRequest::badge("Conf2024", "Participant", creator);
        req.total_units = 100;
        assert!(matches!(
            build_asset_create(&req, &params()),
            Err(TransactionError::InvalidRequest(_))
        ));
    }

    #[test]
    fn malformed_creator_rejected() {
        let req = AssetCreationRequest::badge("Conf2024", "Participant", WalletAddress::new("X"));
        assert!(matches!(
            build_asset_create(&req, &params()),
            Err(TransactionError::InvalidAddress(_))
        ));
    }
}
