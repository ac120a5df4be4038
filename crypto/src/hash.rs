//! SHA-512/256 hashing for address checksums and transaction ids.

use sha2::{Digest, Sha512_256};

/// Compute the SHA-512/256 digest of arbitrary data.
pub fn sha512_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha512_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Transaction id for an encoded transaction: base32 of SHA-512/256(`TX` || bytes).
pub fn transaction_id(encoded_txn: &[u8]) -> String {
    let digest = sha512_256_multi(&[crate::TRANSACTION_DOMAIN, encoded_txn]);
    crate::encode_base32(&digest)
}
