//! Transaction types for badge issuance and their validation logic.
//!
//! Transaction kinds:
//! - **AssetCreate**: mint a single-unit badge asset owned by the sender
//! - **AssetTransfer**: move units of an asset; a zero-amount self transfer is an opt-in
//!
//! Builders are pure functions of a request plus [`SuggestedParams`]; they
//! never sign and never touch the network.

pub mod asset_create;
pub mod asset_transfer;
pub mod error;
pub mod params;
pub mod validation;

use std::fmt;

use chainbadge_types::{PublicKey, Signature, WalletAddress};
use serde::{Deserialize, Serialize};

pub use asset_create::{build_asset_create, AssetCreateFields};
pub use asset_transfer::{build_asset_transfer, build_opt_in, AssetTransferFields};
pub use error::TransactionError;
pub use params::SuggestedParams;
pub use validation::{validate_signed, validate_transaction};

/// A ledger transaction id: 52 base32 characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields common to every transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHeader {
    pub sender: WalletAddress,
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: String,
    pub note: Vec<u8>,
}

/// What the transaction does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxKind {
    AssetCreate(AssetCreateFields),
    AssetTransfer(AssetTransferFields),
}

/// An unsigned transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub header: TxHeader,
    pub kind: TxKind,
}

impl Transaction {
    /// Assemble a transaction from `params`, pricing the fee on the encoded size.
    pub(crate) fn with_params(
        sender: WalletAddress,
        kind: TxKind,
        params: &SuggestedParams,
    ) -> Result<Self, TransactionError> {
        if !chainbadge_crypto::validate_address(sender.as_str()) {
            return Err(TransactionError::InvalidAddress(sender.to_string()));
        }
        let mut txn = Self {
            header: TxHeader {
                sender,
                fee: 0,
                first_valid: params.first_valid,
                last_valid: params.last_valid,
                genesis_id: params.genesis_id.clone(),
                genesis_hash: params.genesis_hash.clone(),
                note: Vec::new(),
            },
            kind,
        };
        // The fee field is fixed-width, so setting it does not change the size.
        txn.header.fee = params.fee_for(txn.encode()?.len());
        validate_transaction(&txn)?;
        Ok(txn)
    }

    /// Attach a note and re-price the fee for the new size.
    ///
    /// A random note keeps two otherwise identical transactions built in the
    /// same round from sharing an id.
    pub fn with_note(
        mut self,
        note: Vec<u8>,
        params: &SuggestedParams,
    ) -> Result<Self, TransactionError> {
        self.header.note = note;
        self.header.fee = 0;
        self.header.fee = params.fee_for(self.encode()?.len());
        Ok(self)
    }

    /// Canonical byte encoding.
    pub fn encode(&self) -> Result<Vec<u8>, TransactionError> {
        bincode::serialize(self).map_err(|e| TransactionError::Encoding(e.to_string()))
    }

    /// Decode a transaction from its canonical encoding.
    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        bincode::deserialize(bytes).map_err(|e| TransactionError::Encoding(e.to_string()))
    }

    /// The bytes a wallet signs: `TX` || encoding.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(chainbadge_crypto::transaction_signing_bytes(&self.encode()?))
    }

    /// Transaction id, derived from the unsigned encoding.
    pub fn id(&self) -> Result<TxId, TransactionError> {
        Ok(TxId::new(chainbadge_crypto::transaction_id(&self.encode()?)))
    }

    pub fn sender(&self) -> &WalletAddress {
        &self.header.sender
    }
}

/// A transaction together with the sender's signature over its signing bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub txn: Transaction,
    pub signature: Signature,
}

impl SignedTransaction {
    pub fn new(txn: Transaction, signature: Signature) -> Self {
        Self { txn, signature }
    }

    /// Bytes broadcast to the ledger.
    pub fn encode(&self) -> Result<Vec<u8>, TransactionError> {
        bincode::serialize(self).map_err(|e| TransactionError::Encoding(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        bincode::deserialize(bytes).map_err(|e| TransactionError::Encoding(e.to_string()))
    }

    pub fn id(&self) -> Result<TxId, TransactionError> {
        self.txn.id()
    }

    /// Whether the signature was made by the key behind the sender address.
    pub fn verify(&self) -> bool {
        let Some(public_key) = chainbadge_crypto::decode_address(self.txn.sender().as_str())
        else {
            return false;
        };
        let Ok(bytes) = self.txn.signing_bytes() else {
            return false;
        };
        chainbadge_crypto::verify_signature(&bytes, &self.signature, &PublicKey(public_key))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chainbadge_crypto::{derive_address, keypair_from_seed};
    use chainbadge_types::{KeyPair, WalletAddress};

    use crate::SuggestedParams;

    pub fn keypair(seed: u8) -> (KeyPair, WalletAddress) {
        let kp = keypair_from_seed(&[seed; 32]);
        let addr = derive_address(&kp.public);
        (kp, addr)
    }

    pub fn params() -> SuggestedParams {
        SuggestedParams {
            fee: 0,
            min_fee: 1_000,
            first_valid: 100,
            last_valid: 1_100,
            genesis_id: "testnet-v1.0".to_string(),
            genesis_hash: "SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=".to_string(),
            flat_fee: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{keypair, params};
    use super::*;
    use chainbadge_crypto::sign_transaction_bytes;
    use chainbadge_types::AssetCreationRequest;

    fn create_txn(seed: u8) -> (chainbadge_types::KeyPair, Transaction) {
        let (kp, addr) = keypair(seed);
        let req = AssetCreationRequest::badge("Conf2024", "Participant", addr);
        let txn = build_asset_create(&req, &params()).unwrap();
        (kp, txn)
    }

    #[test]
    fn encode_decode_identity() {
        let (_, txn) = create_txn(1);
        let bytes = txn.encode().unwrap();
        assert_eq!(Transaction::decode(&bytes).unwrap(), txn);
    }

    #[test]
    fn id_is_stable_and_distinct() {
        let (_, txn) = create_txn(1);
        assert_eq!(txn.id().unwrap(), txn.id().unwrap());
        assert_eq!(txn.id().unwrap().as_str().len(), 52);

        let mut other = txn.clone();
        other.header.first_valid += 1;
        assert_ne!(txn.id().unwrap(), other.id().unwrap());
    }

    #[test]
    fn note_changes_id_and_fee() {
        let (_, txn) = create_txn(2);
        let mut per_byte = params();
        per_byte.fee = 10;
        let noted = txn.clone().with_note(vec![1, 2, 3, 4], &per_byte).unwrap();
        assert_eq!(noted.header.note, vec![1, 2, 3, 4]);
        assert_ne!(noted.id().unwrap(), txn.id().unwrap());

        let bare = txn.with_note(Vec::new(), &per_byte).unwrap();
        assert!(noted.header.fee > bare.header.fee);
    }

    #[test]
    fn signed_transaction_verifies() {
        let (kp, txn) = create_txn(3);
        let sig = sign_transaction_bytes(&txn.encode().unwrap(), &kp.private);
        let signed = SignedTransaction::new(txn, sig);
        assert!(signed.verify());

        let bytes = signed.encode().unwrap();
        assert_eq!(SignedTransaction::decode(&bytes).unwrap(), signed);
    }

    #[test]
    fn signature_from_other_key_fails() {
        let (_, txn) = create_txn(3);
        let (other, _) = keypair(4);
        let sig = sign_transaction_bytes(&txn.encode().unwrap(), &other.private);
        assert!(!SignedTransaction::new(txn, sig).verify());
    }

    #[test]
    fn tampered_transaction_fails() {
        let (kp, txn) = create_txn(5);
        let sig = sign_transaction_bytes(&txn.encode().unwrap(), &kp.private);
        let mut signed = SignedTransaction::new(txn, sig);
        signed.txn.header.fee += 1;
        assert!(!signed.verify());
    }
}
