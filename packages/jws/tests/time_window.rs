//! Validity window checks against an injected clock

use chrono::Duration;
use cryypt_jws::{EngineConfig, FixedClock, JwtError, Key, TokenEngine};
use serde_json::json;
use std::sync::Arc;

const ISSUED: f64 = 1_700_000_000.0;

fn engine_at(now: f64) -> TokenEngine {
    TokenEngine::new().with_clock(Arc::new(FixedClock(now)))
}

#[test]
fn test_window_is_checked_after_signature() {
    let key = Key::from("k");
    let token = engine_at(ISSUED).encode(&json!({}), &key, 0.0, 10.0).unwrap();
    // expired, but the wrong key is reported first
    assert_eq!(
        engine_at(ISSUED + 100.0).decode(&token, &Key::from("other")),
        Err(JwtError::BadSignature)
    );
    assert_eq!(
        engine_at(ISSUED + 100.0).decode(&token, &key),
        Err(JwtError::Expired { exp: ISSUED + 10.0 })
    );
}

#[test]
fn test_future_not_before() {
    let key = Key::from("k");
    let token = engine_at(ISSUED)
        .encode(&json!({}), &key, ISSUED + 60.0, 3600.0)
        .unwrap();

    let error = engine_at(ISSUED + 30.0).decode(&token, &key).unwrap_err();
    assert_eq!(error, JwtError::NotYetValid { nbf: ISSUED + 60.0 });
    assert!(error.is_temporal());
    assert!(engine_at(ISSUED + 60.0).decode(&token, &key).is_ok());
}

#[test]
fn test_expires_in_duration() {
    let key = Key::from("k");
    let token = engine_at(ISSUED)
        .token(json!({"d": true}))
        .expires_in(Duration::minutes(5))
        .sign(&key)
        .unwrap();
    let payload = engine_at(ISSUED).decode_payload(&token, &key).unwrap();
    assert_eq!(payload.iat, ISSUED);
    assert_eq!(payload.nbf, ISSUED);
    assert_eq!(payload.exp, ISSUED + 300.0);
}

#[test]
fn test_leeway_from_config_document() {
    let key = Key::from("k");
    let config = EngineConfig::from_json_str(r#"{"leeway_seconds": 30}"#).unwrap();
    let token = engine_at(ISSUED).encode(&json!({}), &key, ISSUED, 10.0).unwrap();

    let lenient = engine_at(ISSUED + 35.0).with_config(config);
    assert!(lenient.decode(&token, &key).is_ok());
    assert!(matches!(
        engine_at(ISSUED + 35.0).decode(&token, &key),
        Err(JwtError::Expired { .. })
    ));
}

#[test]
fn test_system_clock_token_is_immediately_valid() {
    let engine = TokenEngine::new();
    let key = Key::from("k");
    let token = engine
        .token(json!({"now": true}))
        .expires_in(Duration::hours(1))
        .sign(&key)
        .unwrap();
    assert_eq!(engine.decode(&token, &key).unwrap(), json!({"now": true}));
}
