//! Token error taxonomy
//!
//! Every failure of an encode or decode call is surfaced as one of these
//! variants. Nothing is retried inside the engine.

use thiserror::Error;

/// Result type used throughout the crate
pub type JwtResult<T> = Result<T, JwtError>;

/// Errors produced while issuing or verifying a token
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JwtError {
    /// Claims could not be serialized, or could not be read back as the requested type
    #[error("Invalid claims type: {0}")]
    InvalidClaimsType(String),

    /// Requested or header-declared algorithm is not registered or not allowed
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Wrong segment count, or a segment failed canonical decoding
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Signature verification failed
    #[error("Signature verification failed")]
    BadSignature,

    /// Current time precedes the token's not-before timestamp
    #[error("Token not yet valid, becomes active at {nbf}")]
    NotYetValid {
        /// Not-before timestamp carried by the token
        nbf: f64,
    },

    /// Current time is past the token's expiry timestamp
    #[error("Token expired at {exp}")]
    Expired {
        /// Expiry timestamp carried by the token
        exp: f64,
    },

    /// Key handle does not fit the algorithm family
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The signer itself failed to produce a signature
    #[error("Signing error: {0}")]
    SigningError(String),

    /// Not-before lies after expiry (only raised when window ordering is enforced)
    #[error("Invalid validity window: nbf {nbf} is after exp {exp}")]
    InvalidWindow {
        /// Requested not-before timestamp
        nbf: f64,
        /// Computed expiry timestamp
        exp: f64,
    },

    /// Engine configuration could not be loaded
    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),

    /// Background task failed before delivering a result
    #[error("Background task failed")]
    TaskFailed,
}

impl JwtError {
    /// Create an invalid claims type error
    #[inline]
    #[must_use]
    pub fn invalid_claims_type(msg: &str) -> Self {
        JwtError::InvalidClaimsType(msg.to_string())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed_token(msg: &str) -> Self {
        JwtError::MalformedToken(msg.to_string())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        JwtError::InvalidKey(msg.to_string())
    }

    /// Create a signing error
    #[inline]
    #[must_use]
    pub fn signing_error(msg: &str) -> Self {
        JwtError::SigningError(msg.to_string())
    }

    /// True for the two time-window failures
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(self, JwtError::NotYetValid { .. } | JwtError::Expired { .. })
    }
}
