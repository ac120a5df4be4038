//! Wallet key material.

use chainbadge_types::{KeyPair, PrivateKey, PublicKey};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

fn keypair_of(signing_key: &SigningKey) -> KeyPair {
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// A fresh wallet key from the OS random source.
pub fn generate_keypair() -> KeyPair {
    keypair_of(&SigningKey::generate(&mut OsRng))
}

pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    PublicKey(SigningKey::from_bytes(&private.0).verifying_key().to_bytes())
}

pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    keypair_of(&SigningKey::from_bytes(&private.0))
}

/// Deterministic key pair; the seed is the Ed25519 secret itself.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    keypair_of(&SigningKey::from_bytes(seed))
}

/// Read a 32-byte secret, e.g. decrypted keystore plaintext.
pub fn private_key_from_slice(bytes: &[u8]) -> Option<PrivateKey> {
    let secret: [u8; 32] = bytes.try_into().ok()?;
    Some(PrivateKey(secret))
}
