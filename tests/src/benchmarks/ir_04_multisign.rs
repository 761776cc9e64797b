//! # IR-04 Multi-Signature Benchmarks
//!
//! Cost of checking a relay-hub quorum certificate as the validator set
//! grows. Signatures are recovered in parallel, so larger sets should
//! scale better than linearly on multi-core machines.

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use ir_04_relay_client::domain::address_from_pubkey;
use ir_04_relay_client::verify_multi_sign;
use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};
use std::time::Duration;

fn validator() -> (SigningKey, String) {
    let key = SigningKey::random(&mut rand::thread_rng());
    let address = format!("0x{}", hex::encode(address_from_pubkey(key.verifying_key())));
    (key, address)
}

fn sign(hash: &[u8; 32], key: &SigningKey) -> Vec<u8> {
    let (signature, recid) = key
        .sign_prehash_recoverable(hash)
        .expect("signing failed");
    let mut out = signature.to_bytes().to_vec();
    out.push(recid.to_byte() + 27);
    out
}

/// Quorum checks over validator sets of increasing size.
pub fn verify_quorum(c: &mut Criterion) {
    let mut group = c.benchmark_group("ir-04-multisign");
    group.measurement_time(Duration::from_secs(5));

    let hash: [u8; 32] = Keccak256::digest(b"interchain receipt").into();
    for size in [4usize, 16, 64] {
        let (keys, validators): (Vec<_>, Vec<_>) = (0..size).map(|_| validator()).unzip();
        let signatures: Vec<Vec<u8>> = keys.iter().map(|k| sign(&hash, k)).collect();
        let threshold = (size * 2 / 3 + 1) as u64;

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("verify_multi_sign", size),
            &(signatures, validators),
            |b, (signatures, validators)| {
                b.iter(|| {
                    black_box(verify_multi_sign(&hash, signatures, validators, threshold).unwrap_or(false))
                })
            },
        );
    }
    group.finish();
}
