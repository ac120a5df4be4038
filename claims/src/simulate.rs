//! Locally fabricated badge ids.

use chainbadge_types::AssetId;
use rand::Rng;

/// Lowest simulated asset id. Ledger ids stay far below it.
pub const SIMULATED_ID_FLOOR: AssetId = 1 << 62;

/// A random id in `[SIMULATED_ID_FLOOR, u64::MAX]`.
pub fn simulated_asset_id() -> AssetId {
    rand::thread_rng().gen_range(SIMULATED_ID_FLOOR..=AssetId::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_stay_in_the_simulated_range() {
        for _ in 0..1_000 {
            assert!(simulated_asset_id() >= SIMULATED_ID_FLOOR);
        }
    }
}
