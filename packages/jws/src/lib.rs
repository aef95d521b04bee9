//! Compact signed tokens with pluggable signing algorithms
//!
//! This crate provides:
//! - A canonical `header.payload.signature` codec over URL-safe base64
//! - HMAC-SHA2 (`HS256`/`HS384`/`HS512`) and RSA-PSS (`RS256`/`RS384`/`RS512`)
//! - A prefix-keyed algorithm registry
//! - A token engine with strict, ordered verification
//! - Blocking-pool futures for use inside async code
//!
//! ```
//! use cryypt_jws::{Key, TokenEngine};
//! use serde_json::json;
//!
//! let engine = TokenEngine::new();
//! let key = Key::from("secret key");
//! let token = engine.encode(&json!({"sample": "claim"}), &key, 0.0, 3600.0)?;
//! assert_eq!(engine.decode(&token, &key)?, json!({"sample": "claim"}));
//! # Ok::<(), cryypt_jws::JwtError>(())
//! ```

pub mod algorithms;
mod clock;
pub mod codec;
mod config;
mod engine;
mod error;
mod futures;
mod keys;
mod registry;
mod types;

pub use algorithms::{HmacAlgorithm, RsaPssAlgorithm, SigningAlgorithm};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{EncodeOptions, TokenEngine, TokenRequest};
pub use error::*;
pub use futures::{TokenGenerationFuture, TokenVerificationFuture};
pub use keys::Key;
pub use registry::{AlgorithmRegistry, RegistryBuilder};
pub use types::*;

// Key material types callers need to build `Key::RsaPrivate` / `Key::RsaPublic`
pub use rsa::{RsaPrivateKey, RsaPublicKey};
