//! Signature algorithm strategies
//!
//! One implementation per algorithm family. Each declares the identifiers it
//! owns; the registry only dispatches ids a strategy has declared, and the id
//! (never the key type) decides which hash is used.

mod hmac;
mod rsa;

pub use self::hmac::HmacAlgorithm;
pub use self::rsa::RsaPssAlgorithm;

use crate::error::{JwtError, JwtResult};
use crate::keys::Key;
use crate::types::{AlgorithmFamily, AlgorithmId};

/// Sign/verify capability for one algorithm family
///
/// Implementations must be thread-safe; a single instance is shared by every
/// engine call in the process.
pub trait SigningAlgorithm: Send + Sync + 'static {
    /// Family this strategy implements
    fn family(&self) -> AlgorithmFamily;

    /// Identifiers this strategy owns
    fn supported_ids(&self) -> &'static [AlgorithmId];

    /// Sign `signing_input`, returning the signature as lowercase hex
    fn sign(&self, alg: AlgorithmId, signing_input: &[u8], key: &Key) -> JwtResult<String>;

    /// Check a hex signature over `signing_input`
    ///
    /// Returns `Ok(false)` for any cryptographic mismatch. `Err` is reserved
    /// for structural problems such as a key of the wrong family.
    fn verify(
        &self,
        alg: AlgorithmId,
        signing_input: &[u8],
        signature_hex: &str,
        key: &Key,
    ) -> JwtResult<bool>;

    /// Identifier matching `alg` exactly, if this strategy declares it
    fn lookup(&self, alg: &str) -> Option<AlgorithmId> {
        self.supported_ids()
            .iter()
            .copied()
            .find(|id| id.as_str() == alg)
    }
}

/// Reject ids outside a strategy's declared set
pub(crate) fn ensure_supported<A: SigningAlgorithm + ?Sized>(
    strategy: &A,
    alg: AlgorithmId,
) -> JwtResult<()> {
    if strategy.supported_ids().contains(&alg) {
        Ok(())
    } else {
        Err(JwtError::unsupported_algorithm(alg.as_str()))
    }
}
