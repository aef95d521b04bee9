//! HMAC-SHA2 strategy (HS256, HS384, HS512)

use super::{SigningAlgorithm, ensure_supported};
use crate::error::{JwtError, JwtResult};
use crate::keys::Key;
use crate::types::{AlgorithmFamily, AlgorithmId};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

const HMAC_IDS: &[AlgorithmId] = &[AlgorithmId::HS256, AlgorithmId::HS384, AlgorithmId::HS512];

/// Keyed-hash signatures over a shared secret
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacAlgorithm;

impl HmacAlgorithm {
    fn digest(alg: AlgorithmId, message: &[u8], secret: &[u8]) -> JwtResult<Vec<u8>> {
        let invalid = |_| JwtError::invalid_key("Invalid HMAC key");
        let bytes = match alg {
            AlgorithmId::HS256 => {
                let mut mac = HmacSha256::new_from_slice(secret).map_err(invalid)?;
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            AlgorithmId::HS384 => {
                let mut mac = HmacSha384::new_from_slice(secret).map_err(invalid)?;
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            AlgorithmId::HS512 => {
                let mut mac = HmacSha512::new_from_slice(secret).map_err(invalid)?;
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            other => return Err(JwtError::unsupported_algorithm(other.as_str())),
        };
        Ok(bytes)
    }
}

impl SigningAlgorithm for HmacAlgorithm {
    fn family(&self) -> AlgorithmFamily {
        AlgorithmFamily::Hmac
    }

    fn supported_ids(&self) -> &'static [AlgorithmId] {
        HMAC_IDS
    }

    fn sign(&self, alg: AlgorithmId, signing_input: &[u8], key: &Key) -> JwtResult<String> {
        ensure_supported(self, alg)?;
        let secret = key.require_secret(alg)?;
        Ok(hex::encode(Self::digest(alg, signing_input, secret)?))
    }

    fn verify(
        &self,
        alg: AlgorithmId,
        signing_input: &[u8],
        signature_hex: &str,
        key: &Key,
    ) -> JwtResult<bool> {
        let expected = self.sign(alg, signing_input, key)?;
        // no early exit on the first differing byte
        Ok(expected.as_bytes().ct_eq(signature_hex.as_bytes()).into())
    }
}
