use proptest::prelude::*;

use chainbadge_types::{AssetCreationRequest, SignedChallenge, Timestamp, TypesError, WalletAddress};

fn creator() -> WalletAddress {
    WalletAddress::new("C".repeat(58))
}

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Timestamp elapsed_since saturates to 0 when now < self.
    #[test]
    fn timestamp_elapsed_since_saturates(
        base in 1u64..1_000_000,
        deficit in 1u64..1_000_000,
    ) {
        let later = Timestamp::new(base + deficit);
        let earlier = Timestamp::new(base);
        prop_assert_eq!(later.elapsed_since(earlier), 0);
        prop_assert_eq!(earlier.elapsed_since(later), deficit);
    }

    /// Any total other than one unit is refused.
    #[test]
    fn only_single_unit_assets_validate(total in 0u64..10_000) {
        let mut req = AssetCreationRequest::new("Badge", "BADGE", "", creator());
        req.total_units = total;
        if total == 1 {
            prop_assert!(req.validate().is_ok());
        } else {
            prop_assert_eq!(req.validate(), Err(TypesError::InvalidTotal(total)));
        }
    }

    /// Names within the byte limit validate, longer ones do not.
    #[test]
    fn name_length_limit(len in 1usize..64) {
        let req = AssetCreationRequest::new("n".repeat(len), "BADGE", "", creator());
        prop_assert_eq!(req.validate().is_ok(), len <= 32);
    }

    /// Hex transport of a signature preserves every byte, whatever the length.
    #[test]
    fn signed_challenge_hex_preserves_bytes(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let signed = SignedChallenge::new("msg", bytes.clone(), creator());
        let back = SignedChallenge::from_hex("msg", &signed.signature_hex(), creator()).unwrap();
        prop_assert_eq!(back.signature_bytes, bytes);
    }
}
