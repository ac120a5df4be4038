//! Wallet address derivation from public keys.
//!
//! Address format: base32(public_key || checksum), 58 characters, no padding.
//!
//! Checksum: last 4 bytes of SHA-512/256(public_key).
//! Base32 alphabet: RFC 4648 (`A-Z2-7`).

use chainbadge_types::{PublicKey, WalletAddress};

/// RFC 4648 base32 alphabet.
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Checksum length in bytes.
const CHECKSUM_LEN: usize = 4;
/// Encoded address length: (32 + 4) bytes = 288 bits → ceil(288/5) = 58 chars.
const ADDRESS_LEN: usize = 58;

/// Encode a byte slice as unpadded RFC 4648 base32.
pub fn encode_base32(bytes: &[u8]) -> String {
    let total_bits = bytes.len() * 8;
    let num_chars = total_bits.div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u32 = 0;
    let mut bits_in_buffer = 0;
    for &byte in bytes {
        buffer = (buffer << 8) | byte as u32;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
        buffer &= (1 << bits_in_buffer) - 1;
    }
    // Remaining bits (padded with zeros on the right).
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

/// Decode unpadded base32 into exactly `N` bytes.
///
/// Returns `None` on invalid characters, wrong length, or non-zero trailing bits.
fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    if s.len() != (N * 8).div_ceil(5) {
        return None;
    }
    let mut buffer: u32 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u32;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos == N {
                return None;
            }
            result[pos] = (buffer >> bits_in_buffer) as u8;
            pos += 1;
            buffer &= (1 << bits_in_buffer) - 1;
        }
    }

    if pos < N || buffer != 0 {
        return None;
    }
    Some(result)
}

fn checksum(public_key: &[u8; 32]) -> [u8; CHECKSUM_LEN] {
    let hash = crate::sha512_256(public_key);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hash[32 - CHECKSUM_LEN..]);
    out
}

/// Derive a wallet address from a public key.
///
/// Process:
/// 1. Compute checksum = SHA-512/256(public_key)[28..32]
/// 2. Address = base32(public_key || checksum)
pub fn derive_address(public_key: &PublicKey) -> WalletAddress {
    let mut raw = [0u8; 32 + CHECKSUM_LEN];
    raw[..32].copy_from_slice(public_key.as_bytes());
    raw[32..].copy_from_slice(&checksum(public_key.as_bytes()));
    WalletAddress::new(encode_base32(&raw))
}

/// Extract the public key bytes from a valid address.
///
/// Returns `None` if the address is malformed or has an invalid checksum.
pub fn decode_address(address: &str) -> Option<[u8; 32]> {
    if address.len() != ADDRESS_LEN {
        return None;
    }
    let raw: [u8; 32 + CHECKSUM_LEN] = decode_base32_fixed(address)?;

    let mut pubkey_bytes = [0u8; 32];
    pubkey_bytes.copy_from_slice(&raw[..32]);
    if raw[32..] != checksum(&pubkey_bytes) {
        return None;
    }

    Some(pubkey_bytes)
}

/// Validate that an address string is well-formed and its checksum is correct.
pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_some()
}
