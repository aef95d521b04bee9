//! Benchmarks for token issue and verification

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use cryypt_jws::{AlgorithmId, EncodeOptions, Key, RsaPrivateKey, TokenEngine};
use rsa::rand_core::OsRng;
use serde_json::json;
use std::hint::black_box;
use tokio::runtime::Runtime;

fn keys_for(alg: AlgorithmId, rsa_key: &RsaPrivateKey) -> (Key, Key) {
    match alg {
        AlgorithmId::HS256 | AlgorithmId::HS384 | AlgorithmId::HS512 => {
            (Key::from("bench secret"), Key::from("bench secret"))
        }
        _ => (Key::from(rsa_key.clone()), Key::from(rsa_key.to_public_key())),
    }
}

/// Encode and decode per algorithm
fn benchmark_algorithms(c: &mut Criterion) {
    let rsa_key = RsaPrivateKey::new(&mut OsRng, 2048).expect("generate rsa key");
    let engine = TokenEngine::new();
    let claims = json!({"sub": "bench-user", "scopes": ["read", "write"], "tenant": 42});

    let mut encode_group = c.benchmark_group("encode");
    for alg in AlgorithmId::ALL {
        let (signing, _) = keys_for(alg, &rsa_key);
        encode_group.bench_with_input(BenchmarkId::from_parameter(alg), &signing, |b, key| {
            b.iter(|| {
                let token = engine
                    .token(&claims)
                    .algorithm(alg)
                    .expires_after(3600.0)
                    .sign(key)
                    .expect("encode should succeed");
                black_box(token);
            });
        });
    }
    encode_group.finish();

    let mut decode_group = c.benchmark_group("decode");
    for alg in AlgorithmId::ALL {
        let (signing, verifying) = keys_for(alg, &rsa_key);
        let token = engine
            .token(&claims)
            .algorithm(alg)
            .expires_after(3600.0)
            .sign(&signing)
            .expect("encode should succeed");
        decode_group.bench_with_input(BenchmarkId::from_parameter(alg), &token, |b, token| {
            b.iter(|| black_box(engine.decode(token, &verifying).expect("decode should succeed")));
        });
    }
    decode_group.finish();
}

/// Overhead of the blocking-pool facade against the direct call
fn benchmark_async_facade(c: &mut Criterion) {
    let rt = Runtime::new().expect("build runtime");
    let engine = TokenEngine::new();
    let key = Key::from("bench secret");
    let mut group = c.benchmark_group("async_facade");

    group.bench_function("HS256_encode_async", |b| {
        b.iter(|| {
            rt.block_on(async {
                let token = engine
                    .encode_async(json!({"n": 1}), key.clone(), EncodeOptions::new(0.0, 60.0))
                    .await
                    .expect("encode should succeed");
                black_box(token);
            });
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_algorithms, benchmark_async_facade);
criterion_main!(benches);
