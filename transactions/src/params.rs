//! Network parameters a transaction is built against.

use serde::{Deserialize, Serialize};

/// Bytes added to the encoded length to account for the signature when
/// estimating a per-byte fee.
pub const SIGNATURE_OVERHEAD: u64 = 75;

/// Fee and validity parameters suggested by the ledger.
///
/// These go stale: a transaction rejected by the pool must be rebuilt with
/// fresh parameters, never resubmitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedParams {
    /// Fee per byte, or the absolute fee when `flat_fee` is set.
    pub fee: u64,
    pub min_fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: String,
    #[serde(default)]
    pub flat_fee: bool,
}

impl SuggestedParams {
    /// Fee for a transaction whose unsigned encoding is `encoded_len` bytes.
    pub fn fee_for(&self, encoded_len: usize) -> u64 {
        if self.flat_fee {
            return self.fee.max(self.min_fee);
        }
        let size = encoded_len as u64 + SIGNATURE_OVERHEAD;
        self.fee.saturating_mul(size).max(self.min_fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(fee: u64, flat: bool) -> SuggestedParams {
        SuggestedParams {
            fee,
            min_fee: 1_000,
            first_valid: 1,
            last_valid: 1_001,
            genesis_id: "dev".into(),
            genesis_hash: "hash".into(),
            flat_fee: flat,
        }
    }

    #[test]
    fn zero_per_byte_fee_uses_minimum() {
        assert_eq!(params(0, false).fee_for(200), 1_000);
    }

    #[test]
    fn per_byte_fee_scales_with_size() {
        assert_eq!(params(10, false).fee_for(200), 10 * (200 + SIGNATURE_OVERHEAD));
    }

    #[test]
    fn flat_fee_respects_minimum() {
        assert_eq!(params(5_000, true).fee_for(200), 5_000);
        assert_eq!(params(10, true).fee_for(200), 1_000);
    }
}
