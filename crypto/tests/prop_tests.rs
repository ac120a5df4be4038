use proptest::prelude::*;

use chainbadge_crypto::{
    derive_address, keypair_from_seed, sign_data, validate_address, verify_data_signature,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A data signature always verifies against the signer's address.
    #[test]
    fn data_signature_roundtrip(
        seed in prop::array::uniform32(any::<u8>()),
        message in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let kp = keypair_from_seed(&seed);
        let addr = derive_address(&kp.public);
        let sig = sign_data(&message, &kp.private);
        prop_assert!(verify_data_signature(&message, &sig.0, addr.as_str()));
    }

    /// Flipping any single bit of the signature breaks verification.
    #[test]
    fn signature_bit_flip_fails(
        seed in prop::array::uniform32(any::<u8>()),
        message in prop::collection::vec(any::<u8>(), 0..64),
        bit in 0usize..512,
    ) {
        let kp = keypair_from_seed(&seed);
        let addr = derive_address(&kp.public);
        let mut sig = sign_data(&message, &kp.private).0;
        sig[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(!verify_data_signature(&message, &sig, addr.as_str()));
    }

    /// Flipping any single bit of the message breaks verification.
    #[test]
    fn message_bit_flip_fails(
        seed in prop::array::uniform32(any::<u8>()),
        message in prop::collection::vec(any::<u8>(), 1..64),
        bit_seed in any::<usize>(),
    ) {
        let kp = keypair_from_seed(&seed);
        let addr = derive_address(&kp.public);
        let sig = sign_data(&message, &kp.private);
        let bit = bit_seed % (message.len() * 8);
        let mut tampered = message.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(!verify_data_signature(&tampered, &sig.0, addr.as_str()));
    }

    /// Signatures of the wrong byte length are rejected, never a panic.
    #[test]
    fn wrong_length_signature_rejected(
        seed in prop::array::uniform32(any::<u8>()),
        sig in prop::collection::vec(any::<u8>(), 0..128),
    ) {
        prop_assume!(sig.len() != 64);
        let kp = keypair_from_seed(&seed);
        let addr = derive_address(&kp.public);
        prop_assert!(!verify_data_signature(b"msg", &sig, addr.as_str()));
    }

    /// Arbitrary strings never panic the address decoder and are almost never valid.
    #[test]
    fn arbitrary_address_strings_do_not_panic(s in "\\PC{0,80}") {
        let _ = validate_address(&s);
        prop_assert!(!verify_data_signature(b"msg", &[0u8; 64], &s));
    }
}
