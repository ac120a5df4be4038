use chainbadge_crypto::{derive_address, keypair_from_seed, sign_data};
use chainbadge_types::{SignedChallenge, WalletAddress};
use chainbadge_wallet_core::verify_signed_challenge;
use proptest::prelude::*;

fn signed(seed: [u8; 32], message: &str) -> SignedChallenge {
    let kp = keypair_from_seed(&seed);
    let sig = sign_data(message.as_bytes(), &kp.private);
    SignedChallenge::new(message, sig.0.to_vec(), derive_address(&kp.public))
}

proptest! {
    #[test]
    fn signed_challenge_verifies(seed in any::<[u8; 32]>(), message in ".{0,64}") {
        prop_assert!(verify_signed_challenge(&signed(seed, &message)));
    }

    #[test]
    fn flipped_signature_bit_fails(
        seed in any::<[u8; 32]>(),
        message in ".{0,64}",
        bit in 0usize..512,
    ) {
        let mut s = signed(seed, &message);
        s.signature_bytes[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(!verify_signed_challenge(&s));
    }

    #[test]
    fn flipped_message_bit_fails(
        seed in any::<[u8; 32]>(),
        message in "[a-z]{1,64}",
        bit in 0usize..7,
    ) {
        let mut s = signed(seed, &message);
        let mut bytes = s.message.clone().into_bytes();
        bytes[0] ^= 1 << bit;
        // Lower-case ASCII with one of its low seven bits flipped stays ASCII.
        s.message = String::from_utf8(bytes).unwrap();
        prop_assert!(!verify_signed_challenge(&s));
    }

    #[test]
    fn wrong_length_signature_fails(
        seed in any::<[u8; 32]>(),
        len in (0usize..128).prop_filter("not 64", |l| *l != 64),
    ) {
        let mut s = signed(seed, "auth-challenge");
        s.signature_bytes.resize(len, 0);
        prop_assert!(!verify_signed_challenge(&s));
    }

    #[test]
    fn malformed_address_fails(seed in any::<[u8; 32]>(), address in "[A-Z2-7]{0,70}") {
        let mut s = signed(seed, "auth-challenge");
        prop_assume!(address != s.signer.as_str());
        s.signer = WalletAddress::new(address);
        prop_assert!(!verify_signed_challenge(&s));
    }
}
