//! Algorithm registry
//!
//! Immutable `prefix -> strategy` mapping. Resolution is two-level: the first
//! two characters select a strategy, and that strategy must declare the full
//! identifier. An id such as `HSxxx` never falls through to a default.

use crate::algorithms::{HmacAlgorithm, RsaPssAlgorithm, SigningAlgorithm};
use crate::error::{JwtError, JwtResult};
use crate::types::AlgorithmId;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const PREFIX_LEN: usize = 2;

static STANDARD: Lazy<Arc<AlgorithmRegistry>> = Lazy::new(|| {
    Arc::new(
        AlgorithmRegistry::builder()
            .register(HmacAlgorithm)
            .register(RsaPssAlgorithm)
            .build(),
    )
});

/// Read-only lookup from algorithm id to strategy
pub struct AlgorithmRegistry {
    strategies: HashMap<&'static str, Arc<dyn SigningAlgorithm>>,
}

/// Collects strategies before freezing them into a registry
#[derive(Default)]
pub struct RegistryBuilder {
    strategies: HashMap<&'static str, Arc<dyn SigningAlgorithm>>,
}

impl RegistryBuilder {
    /// Register a strategy under its family prefix; a later registration for
    /// the same prefix replaces the earlier one
    #[must_use]
    pub fn register<A: SigningAlgorithm>(mut self, strategy: A) -> Self {
        self.strategies
            .insert(strategy.family().prefix(), Arc::new(strategy));
        self
    }

    /// Freeze the registry
    #[must_use]
    pub fn build(self) -> AlgorithmRegistry {
        AlgorithmRegistry {
            strategies: self.strategies,
        }
    }
}

impl AlgorithmRegistry {
    /// Start an empty registry
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Shared registry with the HMAC and RSA-PSS strategies, built once per process
    #[must_use]
    pub fn standard() -> Arc<AlgorithmRegistry> {
        Arc::clone(&STANDARD)
    }

    /// Resolve an id from a caller or a token header
    ///
    /// # Errors
    /// `UnsupportedAlgorithm` when no prefix matches or the matched strategy
    /// does not declare the full id.
    pub fn resolve(&self, alg: &str) -> JwtResult<(AlgorithmId, &dyn SigningAlgorithm)> {
        let strategy = alg
            .get(..PREFIX_LEN)
            .and_then(|prefix| self.strategies.get(prefix))
            .ok_or_else(|| JwtError::unsupported_algorithm(alg))?;
        let id = strategy
            .lookup(alg)
            .ok_or_else(|| JwtError::unsupported_algorithm(alg))?;
        Ok((id, strategy.as_ref()))
    }

    /// Every id that [`resolve`](Self::resolve) accepts, in canonical order
    #[must_use]
    pub fn supported_ids(&self) -> Vec<AlgorithmId> {
        AlgorithmId::ALL
            .into_iter()
            .filter(|id| {
                self.strategies
                    .get(id.prefix())
                    .is_some_and(|s| s.supported_ids().contains(id))
            })
            .collect()
    }
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("supported", &self.supported_ids())
            .finish()
    }
}
