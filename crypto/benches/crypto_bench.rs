use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn ed25519_sign_data_bench(c: &mut Criterion) {
    let kp = chainbadge_crypto::generate_keypair();
    let msg = [42u8; 128];

    c.bench_function("ed25519_sign_data_128B", |b| {
        b.iter(|| chainbadge_crypto::sign_data(black_box(&msg), &kp.private))
    });
}

fn ed25519_verify_data_bench(c: &mut Criterion) {
    let kp = chainbadge_crypto::generate_keypair();
    let addr = chainbadge_crypto::derive_address(&kp.public);
    let msg = [42u8; 128];
    let sig = chainbadge_crypto::sign_data(&msg, &kp.private);

    c.bench_function("ed25519_verify_data_128B", |b| {
        b.iter(|| {
            chainbadge_crypto::verify_data_signature(black_box(&msg), &sig.0, addr.as_str())
        })
    });
}

fn sha512_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("sha512_256_256B", |b| {
        b.iter(|| chainbadge_crypto::sha512_256(black_box(&data)))
    });
}

fn address_roundtrip_bench(c: &mut Criterion) {
    let kp = chainbadge_crypto::generate_keypair();
    let addr = chainbadge_crypto::derive_address(&kp.public);

    c.bench_function("address_decode", |b| {
        b.iter(|| chainbadge_crypto::decode_address(black_box(addr.as_str())))
    });
}

criterion_group!(
    benches,
    ed25519_sign_data_bench,
    ed25519_verify_data_bench,
    sha512_256_bench,
    address_roundtrip_bench,
);
criterion_main!(benches);
