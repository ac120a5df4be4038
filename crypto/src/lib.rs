//! Cryptographic primitives for ChainBadge.
//!
//! - **Ed25519** for signing and signature verification
//! - **SHA-512/256** for address checksums and transaction ids
//! - Address derivation: unpadded RFC 4648 base32 of `public_key || checksum`
//! - Domain-separated signing bytes (`MX` for arbitrary data, `TX` for transactions)

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{decode_address, derive_address, encode_base32, validate_address};
pub use hash::{sha512_256, sha512_256_multi, transaction_id};
pub use keys::{
    generate_keypair, keypair_from_private, keypair_from_seed, private_key_from_slice,
    public_from_private,
};
pub use sign::{
    data_signing_bytes, sign_data, sign_message, sign_transaction_bytes,
    transaction_signing_bytes, verify_data_signature, verify_signature, DATA_DOMAIN,
    TRANSACTION_DOMAIN,
};
