//! Key handles supplied per call
//!
//! The engine never generates, parses or stores keys. Callers wrap whatever
//! their key-management layer produced in a [`Key`].

use crate::error::{JwtError, JwtResult};
use crate::types::AlgorithmId;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use zeroize::Zeroizing;

/// Symmetric secret or RSA key handle
#[derive(Clone)]
pub enum Key {
    /// Shared secret for HMAC algorithms
    Secret(Zeroizing<Vec<u8>>),
    /// RSA private key, signs RS* tokens
    RsaPrivate(Box<RsaPrivateKey>),
    /// RSA public key, verifies RS* tokens
    RsaPublic(Box<RsaPublicKey>),
}

impl Key {
    /// Wrap secret bytes for HMAC use
    pub fn secret(bytes: impl AsRef<[u8]>) -> Self {
        Key::Secret(Zeroizing::new(bytes.as_ref().to_vec()))
    }

    /// Short description of the key shape, safe to log
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Key::Secret(_) => "secret",
            Key::RsaPrivate(_) => "rsa-private",
            Key::RsaPublic(_) => "rsa-public",
        }
    }

    /// Secret bytes, or `InvalidKey` if this is not a symmetric key
    pub(crate) fn require_secret(&self, alg: AlgorithmId) -> JwtResult<&[u8]> {
        match self {
            Key::Secret(bytes) => Ok(bytes.as_slice()),
            other => Err(mismatch(alg, "a shared secret", other)),
        }
    }

    /// Private key for signing, or `InvalidKey`
    pub(crate) fn require_rsa_private(&self, alg: AlgorithmId) -> JwtResult<&RsaPrivateKey> {
        match self {
            Key::RsaPrivate(key) => Ok(&**key),
            other => Err(mismatch(alg, "an RSA private key", other)),
        }
    }

    /// Public key for verification; a private handle contributes its public half
    pub(crate) fn require_rsa_public(&self, alg: AlgorithmId) -> JwtResult<RsaPublicKey> {
        match self {
            Key::RsaPublic(key) => Ok((**key).clone()),
            Key::RsaPrivate(key) => Ok(key.to_public_key()),
            other => Err(mismatch(alg, "an RSA public key", other)),
        }
    }
}

fn mismatch(alg: AlgorithmId, expected: &str, got: &Key) -> JwtError {
    JwtError::InvalidKey(format!("{alg} requires {expected}, got {}", got.kind()))
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Secret(bytes) => f
                .debug_struct("Secret")
                .field("len", &bytes.len())
                .finish_non_exhaustive(),
            Key::RsaPrivate(_) => f.write_str("RsaPrivate(..)"),
            Key::RsaPublic(key) => f.debug_tuple("RsaPublic").field(key).finish(),
        }
    }
}

impl From<&str> for Key {
    fn from(secret: &str) -> Self {
        Key::secret(secret)
    }
}

impl From<&[u8]> for Key {
    fn from(secret: &[u8]) -> Self {
        Key::secret(secret)
    }
}

impl From<Vec<u8>> for Key {
    fn from(secret: Vec<u8>) -> Self {
        Key::Secret(Zeroizing::new(secret))
    }
}

impl From<RsaPrivateKey> for Key {
    fn from(key: RsaPrivateKey) -> Self {
        Key::RsaPrivate(Box::new(key))
    }
}

impl From<RsaPublicKey> for Key {
    fn from(key: RsaPublicKey) -> Self {
        Key::RsaPublic(Box::new(key))
    }
}
