//! Identity challenges and their signed form.

use serde::{Deserialize, Serialize};

use crate::{TypesError, WalletAddress};

/// Message presented for signing when none is supplied by a server.
pub const DEFAULT_CHALLENGE_MESSAGE: &str = "Verify your identity for ChainAuth";

/// A string presented to the wallet for signing. Stateless; never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub message: String,
}

impl Challenge {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for Challenge {
    fn default() -> Self {
        Self::new(DEFAULT_CHALLENGE_MESSAGE)
    }
}

/// A challenge together with the signature the wallet produced for it.
///
/// `signature_bytes` is kept as raw bytes: a wallet may hand back anything,
/// and verification must reject bad lengths rather than fail to construct.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedChallenge {
    pub message: String,
    pub signature_bytes: Vec<u8>,
    pub signer: WalletAddress,
}

impl SignedChallenge {
    pub fn new(message: impl Into<String>, signature_bytes: Vec<u8>, signer: WalletAddress) -> Self {
        Self {
            message: message.into(),
            signature_bytes,
            signer,
        }
    }

    /// Hex encoding of the signature, for transport.
    pub fn signature_hex(&self) -> String {
        hex::encode(&self.signature_bytes)
    }

    /// Rebuild a signed challenge from a hex-encoded signature.
    pub fn from_hex(
        message: impl Into<String>,
        signature_hex: &str,
        signer: WalletAddress,
    ) -> Result<Self, TypesError> {
        let bytes =
            hex::decode(signature_hex.trim()).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
        Ok(Self::new(message, bytes, signer))
    }
}
