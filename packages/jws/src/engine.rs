//! Token engine: encode and decode pipelines
//!
//! Encoding resolves the algorithm, builds the header and payload segments,
//! signs `header.payload` and appends the encoded signature. Decoding runs a
//! fixed sequence of checks and stops at the first failure:
//!
//! 1. three segments
//! 2. header decodes and names an algorithm
//! 3. the algorithm resolves (and passes the allow-list)
//! 4. the signature verifies
//! 5. the payload decodes
//! 6. the current time lies inside `[nbf, exp]`
//!
//! Claims are only released after every stage passes.

use crate::clock::{Clock, SystemClock};
use crate::codec::{self, CodecError};
use crate::config::EngineConfig;
use crate::error::{JwtError, JwtResult};
use crate::keys::Key;
use crate::registry::AlgorithmRegistry;
use crate::types::{AlgorithmId, Header, Payload, Token};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::debug;

/// Per-call encode parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodeOptions {
    /// Not-before timestamp; defaults to `iat`
    pub nbf: Option<f64>,
    /// Lifetime in seconds, `exp = iat + exp_after`
    pub exp_after: f64,
    /// Issued-at timestamp; sampled from the engine clock on each call when absent
    pub iat: Option<f64>,
    /// Algorithm id; the configured default when absent
    pub algorithm: Option<String>,
}

impl EncodeOptions {
    /// Options with an explicit window and everything else defaulted
    #[must_use]
    pub fn new(nbf: f64, exp_after: f64) -> Self {
        Self {
            nbf: Some(nbf),
            exp_after,
            ..Self::default()
        }
    }
}

/// Issues and verifies signed tokens
///
/// Holds no key material. Cheap to clone; every clone shares the same
/// registry and clock.
#[derive(Debug, Clone)]
pub struct TokenEngine {
    registry: Arc<AlgorithmRegistry>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl Default for TokenEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEngine {
    /// Engine over the standard registry and the system clock
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: AlgorithmRegistry::standard(),
            clock: Arc::new(SystemClock),
            config: EngineConfig::default(),
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the algorithm registry
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<AlgorithmRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registry used for dispatch
    #[must_use]
    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    /// Issue a token with the default algorithm and a fresh `iat`
    ///
    /// # Errors
    /// See [`encode_with`](Self::encode_with).
    pub fn encode<C: Serialize + ?Sized>(
        &self,
        claims: &C,
        key: &Key,
        nbf: f64,
        exp_after: f64,
    ) -> JwtResult<Token> {
        self.encode_with(claims, key, &EncodeOptions::new(nbf, exp_after))
    }

    /// Start a builder-style encode
    pub fn token<C: Serialize>(&self, claims: C) -> TokenRequest<'_, C> {
        TokenRequest {
            engine: self,
            claims,
            options: EncodeOptions::default(),
        }
    }

    /// Issue a token
    ///
    /// # Errors
    /// - `UnsupportedAlgorithm` when the id does not resolve or is outside
    ///   the configured allow-list
    /// - `InvalidClaimsType` when the claims cannot be serialized
    /// - `InvalidWindow` for non-finite timestamps, or `nbf > exp` when
    ///   window ordering is enforced
    /// - `InvalidKey` / `SigningError` from the strategy
    pub fn encode_with<C: Serialize + ?Sized>(
        &self,
        claims: &C,
        key: &Key,
        options: &EncodeOptions,
    ) -> JwtResult<Token> {
        let result = self.encode_inner(claims, key, options);
        if let Err(error) = &result {
            debug!(%error, key = key.kind(), "token encode failed");
        }
        result
    }

    fn encode_inner<C: Serialize + ?Sized>(
        &self,
        claims: &C,
        key: &Key,
        options: &EncodeOptions,
    ) -> JwtResult<Token> {
        let requested = options
            .algorithm
            .as_deref()
            .unwrap_or(self.config.default_algorithm.as_str());
        let (alg, strategy) = self.registry.resolve(requested)?;
        if !self.config.is_allowed(alg) {
            return Err(JwtError::UnsupportedAlgorithm(format!("{alg} is not allowed")));
        }

        let claims =
            serde_json::to_value(claims).map_err(|e| JwtError::InvalidClaimsType(e.to_string()))?;
        let iat = options.iat.unwrap_or_else(|| self.clock.now());
        let nbf = options.nbf.unwrap_or(iat);
        let exp = iat + options.exp_after;
        if !nbf.is_finite() || !exp.is_finite() {
            return Err(JwtError::InvalidWindow { nbf, exp });
        }
        if self.config.enforce_window_order && nbf > exp {
            return Err(JwtError::InvalidWindow { nbf, exp });
        }

        let header = codec::encode(&Header::new(alg)).map_err(encode_error)?;
        let payload = codec::encode(&Payload {
            iat,
            nbf,
            exp,
            claims,
        })
        .map_err(encode_error)?;

        let signing_input = format!("{header}.{payload}");
        let signature_hex = strategy.sign(alg, signing_input.as_bytes(), key)?;
        let signature = codec::encode_signature(&signature_hex).map_err(encode_error)?;

        debug!(%alg, iat, nbf, exp, "token issued");
        Ok(Token::from_segments(&header, &payload, &signature))
    }

    /// Verify a token and return its claims
    ///
    /// # Errors
    /// The first failing stage decides: `MalformedToken`,
    /// `UnsupportedAlgorithm`, `InvalidKey`, `BadSignature`, `NotYetValid`,
    /// `Expired`.
    pub fn decode(&self, token: impl AsRef<str>, key: &Key) -> JwtResult<serde_json::Value> {
        self.decode_payload(token, key).map(|payload| payload.claims)
    }

    /// Verify a token and deserialize its claims into `T`
    ///
    /// # Errors
    /// As [`decode`](Self::decode), plus `InvalidClaimsType` when the claims
    /// do not fit `T`.
    pub fn decode_as<T: DeserializeOwned>(&self, token: impl AsRef<str>, key: &Key) -> JwtResult<T> {
        let claims = self.decode(token, key)?;
        serde_json::from_value(claims).map_err(|e| JwtError::InvalidClaimsType(e.to_string()))
    }

    /// Verify a token and return the whole payload, timestamps included
    ///
    /// # Errors
    /// As [`decode`](Self::decode).
    pub fn decode_payload(&self, token: impl AsRef<str>, key: &Key) -> JwtResult<Payload> {
        let result = self.decode_inner(token.as_ref(), key);
        if let Err(error) = &result {
            debug!(%error, key = key.kind(), "token rejected");
        }
        result
    }

    fn decode_inner(&self, token: &str, key: &Key) -> JwtResult<Payload> {
        let (header_seg, payload_seg, signature_seg) = split_segments(token)?;

        let header = header_fields(header_seg)?;
        let (alg, strategy) = self.registry.resolve(algorithm_field(&header)?)?;
        if !self.config.is_allowed(alg) {
            return Err(JwtError::UnsupportedAlgorithm(format!("{alg} is not allowed")));
        }

        let signature = codec::decode_signature(signature_seg).map_err(segment_error("signature"))?;
        let signing_input = &token[..header_seg.len() + 1 + payload_seg.len()];
        if !strategy.verify(alg, signing_input.as_bytes(), &signature, key)? {
            return Err(JwtError::BadSignature);
        }

        let payload: Payload = codec::decode(payload_seg).map_err(segment_error("payload"))?;

        let now = self.clock.now();
        let leeway = self.config.leeway_seconds;
        if now + leeway < payload.nbf {
            return Err(JwtError::NotYetValid { nbf: payload.nbf });
        }
        if now - leeway > payload.exp {
            return Err(JwtError::Expired { exp: payload.exp });
        }

        debug!(%alg, "token verified");
        Ok(payload)
    }

    /// Read the header without verifying anything
    ///
    /// Only useful for picking a verification key; the result is untrusted.
    ///
    /// # Errors
    /// `MalformedToken` or `UnsupportedAlgorithm` as in stages 1-2 of decode.
    pub fn inspect_header(&self, token: impl AsRef<str>) -> JwtResult<Header> {
        let (header_seg, _, _) = split_segments(token.as_ref())?;
        let fields = header_fields(header_seg)?;
        let alg = algorithm_field(&fields)?.parse::<AlgorithmId>()?;
        let typ = fields
            .get("typ")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(Header { typ, alg })
    }
}

/// Builder-style encode request, see [`TokenEngine::token`]
#[derive(Debug)]
pub struct TokenRequest<'e, C> {
    engine: &'e TokenEngine,
    claims: C,
    options: EncodeOptions,
}

impl<C: Serialize> TokenRequest<'_, C> {
    /// Not-before timestamp, Unix seconds
    #[must_use]
    pub fn not_before(mut self, nbf: f64) -> Self {
        self.options.nbf = Some(nbf);
        self
    }

    /// Lifetime in seconds from `iat`
    #[must_use]
    pub fn expires_after(mut self, seconds: f64) -> Self {
        self.options.exp_after = seconds;
        self
    }

    /// Lifetime from `iat`
    #[must_use]
    pub fn expires_in(mut self, duration: chrono::Duration) -> Self {
        self.options.exp_after = duration.num_milliseconds() as f64 / 1000.0;
        self
    }

    /// Explicit issued-at timestamp
    #[must_use]
    pub fn issued_at(mut self, iat: f64) -> Self {
        self.options.iat = Some(iat);
        self
    }

    /// Algorithm id, e.g. `"RS256"` or [`AlgorithmId::RS256`]
    #[must_use]
    pub fn algorithm(mut self, alg: impl AsRef<str>) -> Self {
        self.options.algorithm = Some(alg.as_ref().to_string());
        self
    }

    /// Sign and return the token
    ///
    /// # Errors
    /// As [`TokenEngine::encode_with`].
    pub fn sign(self, key: &Key) -> JwtResult<Token> {
        self.engine.encode_with(&self.claims, key, &self.options)
    }
}

fn split_segments(token: &str) -> JwtResult<(&str, &str, &str)> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok((header, payload, signature)),
        _ => Err(JwtError::MalformedToken(format!(
            "expected 3 segments, found {}",
            token.split('.').count()
        ))),
    }
}

fn header_fields(segment: &str) -> JwtResult<serde_json::Map<String, serde_json::Value>> {
    match codec::decode(segment).map_err(segment_error("header"))? {
        serde_json::Value::Object(fields) => Ok(fields),
        _ => Err(JwtError::malformed_token("header is not a JSON object")),
    }
}

fn algorithm_field(fields: &serde_json::Map<String, serde_json::Value>) -> JwtResult<&str> {
    fields
        .get("alg")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| JwtError::unsupported_algorithm("header has no alg field"))
}

fn segment_error(segment: &'static str) -> impl Fn(CodecError) -> JwtError {
    move |e| JwtError::MalformedToken(format!("{segment}: {e}"))
}

fn encode_error(e: CodecError) -> JwtError {
    JwtError::InvalidClaimsType(e.to_string())
}
