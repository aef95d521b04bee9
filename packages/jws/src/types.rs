//! Header, payload, algorithm identifier and token types

use crate::error::JwtError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token type written into every header
pub const TOKEN_TYPE: &str = "JWT";

/// Algorithm family, selected by the two-character id prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// HMAC-SHA2, symmetric secret
    Hmac,
    /// RSA-PSS-SHA2, asymmetric key pair
    RsaPss,
}

impl AlgorithmFamily {
    /// Id prefix owned by this family
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            AlgorithmFamily::Hmac => "HS",
            AlgorithmFamily::RsaPss => "RS",
        }
    }
}

/// Signature algorithm identifier as written in the `alg` header field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmId {
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
    /// RSA-PSS with SHA-256
    RS256,
    /// RSA-PSS with SHA-384
    RS384,
    /// RSA-PSS with SHA-512
    RS512,
}

impl AlgorithmId {
    /// Every identifier known to the crate
    pub const ALL: [AlgorithmId; 6] = [
        AlgorithmId::HS256,
        AlgorithmId::HS384,
        AlgorithmId::HS512,
        AlgorithmId::RS256,
        AlgorithmId::RS384,
        AlgorithmId::RS512,
    ];

    /// Wire name, e.g. `"HS256"`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmId::HS256 => "HS256",
            AlgorithmId::HS384 => "HS384",
            AlgorithmId::HS512 => "HS512",
            AlgorithmId::RS256 => "RS256",
            AlgorithmId::RS384 => "RS384",
            AlgorithmId::RS512 => "RS512",
        }
    }

    /// Family implied by the id prefix
    #[must_use]
    pub fn family(self) -> AlgorithmFamily {
        match self {
            AlgorithmId::HS256 | AlgorithmId::HS384 | AlgorithmId::HS512 => AlgorithmFamily::Hmac,
            AlgorithmId::RS256 | AlgorithmId::RS384 | AlgorithmId::RS512 => {
                AlgorithmFamily::RsaPss
            }
        }
    }

    /// Two-character prefix (`HS` / `RS`)
    #[must_use]
    pub fn prefix(self) -> &'static str {
        self.family().prefix()
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for AlgorithmId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for AlgorithmId {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| JwtError::unsupported_algorithm(s))
    }
}

/// Token header. Field order is part of the signed bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Always `"JWT"`
    pub typ: String,
    /// Algorithm used for the signature
    pub alg: AlgorithmId,
}

impl Header {
    /// Header for the given algorithm
    #[must_use]
    pub fn new(alg: AlgorithmId) -> Self {
        Self {
            typ: TOKEN_TYPE.to_string(),
            alg,
        }
    }
}

/// Token payload. Field order is part of the signed bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Issued at, Unix seconds
    pub iat: f64,
    /// Not before, Unix seconds
    pub nbf: f64,
    /// Expiry, Unix seconds
    pub exp: f64,
    /// Caller claims, opaque to the engine
    pub claims: serde_json::Value,
}

/// Encoded token string `header.payload.signature`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub(crate) fn from_segments(header: &str, payload: &str, signature: &str) -> Self {
        let mut token =
            String::with_capacity(header.len() + payload.len() + signature.len() + 2);
        token.push_str(header);
        token.push('.');
        token.push_str(payload);
        token.push('.');
        token.push_str(signature);
        Self(token)
    }

    /// Borrow the token text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into its dot-separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Unwrap into the underlying string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
