//! Ed25519 message signing and verification.
//!
//! Wallets never sign raw bytes. Arbitrary data is prefixed with
//! [`DATA_DOMAIN`] and transactions with [`TRANSACTION_DOMAIN`], so a signed
//! challenge can never be replayed as a transaction and vice versa.

use chainbadge_types::{PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

/// Prefix for signatures over arbitrary data (auth challenges).
pub const DATA_DOMAIN: &[u8] = b"MX";
/// Prefix for signatures over encoded transactions.
pub const TRANSACTION_DOMAIN: &[u8] = b"TX";

/// Sign a message with a private key, returning the signature.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    let sig = signing_key.sign(message);
    Signature(sig.to_bytes())
}

/// Verify a signature against a message and public key.
///
/// Returns `true` if the signature is valid, `false` otherwise.
/// Uses strict verification: non-canonical signatures and weak keys are rejected.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify_strict(message, &dalek_sig).is_ok()
}

/// The exact bytes a wallet signs for arbitrary data.
pub fn data_signing_bytes(data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(DATA_DOMAIN.len() + data.len());
    bytes.extend_from_slice(DATA_DOMAIN);
    bytes.extend_from_slice(data);
    bytes
}

/// The exact bytes a wallet signs for an encoded transaction.
pub fn transaction_signing_bytes(encoded_txn: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(TRANSACTION_DOMAIN.len() + encoded_txn.len());
    bytes.extend_from_slice(TRANSACTION_DOMAIN);
    bytes.extend_from_slice(encoded_txn);
    bytes
}

/// Sign arbitrary data under the data domain.
pub fn sign_data(data: &[u8], private_key: &PrivateKey) -> Signature {
    sign_message(&data_signing_bytes(data), private_key)
}

/// Sign an encoded transaction under the transaction domain.
pub fn sign_transaction_bytes(encoded_txn: &[u8], private_key: &PrivateKey) -> Signature {
    sign_message(&transaction_signing_bytes(encoded_txn), private_key)
}

/// Verify a data-domain signature against the public key encoded in `address`.
///
/// Entirely offline. Returns `false` for a malformed address, a signature of
/// the wrong length, or a signature that does not match.
pub fn verify_data_signature(data: &[u8], signature_bytes: &[u8], address: &str) -> bool {
    let Some(public_key) = crate::decode_address(address) else {
        return false;
    };
    let Some(signature) = Signature::from_slice(signature_bytes) else {
        return false;
    };
    verify_signature(&data_signing_bytes(data), &signature, &PublicKey(public_key))
}
