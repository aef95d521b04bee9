//! Engine configuration

use crate::error::{JwtError, JwtResult};
use crate::types::AlgorithmId;
use serde::{Deserialize, Serialize};

/// Tunables for [`TokenEngine`](crate::TokenEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Algorithm used when an encode call names none
    #[serde(default = "default_algorithm")]
    pub default_algorithm: AlgorithmId,
    /// Tolerance in seconds applied to both `nbf` and `exp` checks
    #[serde(default)]
    pub leeway_seconds: f64,
    /// Ids accepted from token headers; empty accepts every registered id
    #[serde(default)]
    pub allowed_algorithms: Vec<AlgorithmId>,
    /// Refuse to issue tokens whose `nbf` lies after their `exp`
    #[serde(default)]
    pub enforce_window_order: bool,
}

fn default_algorithm() -> AlgorithmId {
    AlgorithmId::HS256
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_algorithm: default_algorithm(),
            leeway_seconds: 0.0,
            allowed_algorithms: Vec::new(),
            enforce_window_order: false,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON document; absent fields take their defaults
    ///
    /// # Errors
    /// `InvalidConfig` for malformed JSON, unknown algorithm names or a
    /// negative leeway.
    pub fn from_json_str(json: &str) -> JwtResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| JwtError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the default signing algorithm
    #[must_use]
    pub fn with_default_algorithm(mut self, alg: AlgorithmId) -> Self {
        self.default_algorithm = alg;
        self
    }

    /// Set the time leeway in seconds
    #[must_use]
    pub fn with_leeway(mut self, seconds: f64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Restrict the ids accepted from token headers
    #[must_use]
    pub fn allow_algorithms(mut self, algorithms: impl IntoIterator<Item = AlgorithmId>) -> Self {
        self.allowed_algorithms = algorithms.into_iter().collect();
        self
    }

    /// Reject `nbf > exp` when issuing
    #[must_use]
    pub fn enforce_window_order(mut self, enforce: bool) -> Self {
        self.enforce_window_order = enforce;
        self
    }

    /// Whether a header id passes the allow-list
    #[must_use]
    pub fn is_allowed(&self, alg: AlgorithmId) -> bool {
        self.allowed_algorithms.is_empty() || self.allowed_algorithms.contains(&alg)
    }

    fn validate(&self) -> JwtResult<()> {
        if !self.leeway_seconds.is_finite() || self.leeway_seconds < 0.0 {
            return Err(JwtError::InvalidConfig(format!(
                "leeway_seconds must be a non-negative number, got {}",
                self.leeway_seconds
            )));
        }
        Ok(())
    }
}
