//! Wallet address type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A wallet address: 58 base32 characters encoding a public key plus checksum.
///
/// This type only carries the string. Use `chainbadge_crypto::decode_address`
/// to check the checksum and recover the public key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Length of a well-formed address string.
    pub const ENCODED_LEN: usize = 58;

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cheap shape check (length and alphabet). Does not verify the checksum.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == Self::ENCODED_LEN
            && self
                .0
                .bytes()
                .all(|c| c.is_ascii_uppercase() || (b'2'..=b'7').contains(&c))
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
