//! Engine calls driven from async code

use cryypt_jws::{EncodeOptions, JwtError, Key, RsaPrivateKey, TokenEngine};
use rsa::rand_core::OsRng;
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rsa_round_trip_on_blocking_pool() {
    let private = tokio::task::spawn_blocking(|| RsaPrivateKey::new(&mut OsRng, 2048))
        .await
        .unwrap()
        .unwrap();
    let engine = TokenEngine::new();
    let options = EncodeOptions {
        algorithm: Some("RS256".into()),
        ..EncodeOptions::new(0.0, 600.0)
    };

    let token = engine
        .encode_async(json!({"job": 9}), Key::from(private.clone()), options)
        .await
        .unwrap();
    let claims = engine
        .decode_async(token, Key::from(private.to_public_key()))
        .await
        .unwrap();
    assert_eq!(claims, json!({"job": 9}));
}

#[tokio::test]
async fn test_errors_cross_the_channel() {
    let engine = TokenEngine::new();
    let token = engine
        .encode_async(json!({}), Key::from("right"), EncodeOptions::new(0.0, 60.0))
        .await
        .unwrap();
    assert_eq!(
        engine.decode_async(token.as_str(), Key::from("wrong")).await,
        Err(JwtError::BadSignature)
    );
    assert!(matches!(
        engine.decode_async("not-a-token", Key::from("right")).await,
        Err(JwtError::MalformedToken(_))
    ));
}

#[tokio::test]
async fn test_concurrent_verifications() {
    let engine = TokenEngine::new();
    let key = Key::from("shared");
    let token = engine.encode(&json!({"i": 0}), &key, 0.0, 60.0).unwrap();

    let pending: Vec<_> = (0..8)
        .map(|_| engine.decode_async(token.as_str(), key.clone()))
        .collect();
    for future in pending {
        assert_eq!(future.await.unwrap(), json!({"i": 0}));
    }
}
