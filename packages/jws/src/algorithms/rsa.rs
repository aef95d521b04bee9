//! RSA-PSS strategy (RS256, RS384, RS512)
//!
//! PSS padding with MGF1 over the same hash as the id and the maximal salt
//! length the modulus allows. Verification failures of any kind collapse to
//! `false` so callers cannot tell a padding error from a wrong key.

use super::{SigningAlgorithm, ensure_supported};
use crate::error::{JwtError, JwtResult};
use crate::keys::Key;
use crate::types::{AlgorithmFamily, AlgorithmId};
use rsa::pss::Pss;
use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use sha2::{Digest, Sha256, Sha384, Sha512};

const RSA_IDS: &[AlgorithmId] = &[AlgorithmId::RS256, AlgorithmId::RS384, AlgorithmId::RS512];

/// RSA-PSS signatures over an asymmetric key pair
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaPssAlgorithm;

/// Hashed message plus a PSS scheme configured for `salt_len`
fn prepare(alg: AlgorithmId, message: &[u8], salt_len: usize) -> JwtResult<(Vec<u8>, Pss)> {
    let prepared = match alg {
        AlgorithmId::RS256 => (
            Sha256::digest(message).to_vec(),
            Pss::new_with_salt::<Sha256>(salt_len),
        ),
        AlgorithmId::RS384 => (
            Sha384::digest(message).to_vec(),
            Pss::new_with_salt::<Sha384>(salt_len),
        ),
        AlgorithmId::RS512 => (
            Sha512::digest(message).to_vec(),
            Pss::new_with_salt::<Sha512>(salt_len),
        ),
        other => return Err(JwtError::unsupported_algorithm(other.as_str())),
    };
    Ok(prepared)
}

fn hash_len(alg: AlgorithmId) -> usize {
    match alg {
        AlgorithmId::RS384 | AlgorithmId::HS384 => 48,
        AlgorithmId::RS512 | AlgorithmId::HS512 => 64,
        AlgorithmId::RS256 | AlgorithmId::HS256 => 32,
    }
}

/// Largest salt PSS encoding permits: `emLen - hLen - 2`
fn max_salt_len(key: &impl PublicKeyParts, alg: AlgorithmId) -> Option<usize> {
    let em_bits = key.n().bits().checked_sub(1)?;
    let em_len = (em_bits + 7) / 8;
    em_len.checked_sub(hash_len(alg) + 2)
}

fn is_lowercase_hex(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl SigningAlgorithm for RsaPssAlgorithm {
    fn family(&self) -> AlgorithmFamily {
        AlgorithmFamily::RsaPss
    }

    fn supported_ids(&self) -> &'static [AlgorithmId] {
        RSA_IDS
    }

    fn sign(&self, alg: AlgorithmId, signing_input: &[u8], key: &Key) -> JwtResult<String> {
        ensure_supported(self, alg)?;
        let private_key = key.require_rsa_private(alg)?;
        let salt_len = max_salt_len(private_key, alg).ok_or_else(|| {
            JwtError::signing_error("RSA modulus too small for PSS with this hash")
        })?;
        let (hashed, scheme) = prepare(alg, signing_input, salt_len)?;
        let signature = private_key
            .sign_with_rng(&mut OsRng, scheme, &hashed)
            .map_err(|e| JwtError::SigningError(format!("RSA-PSS signing failed: {e}")))?;
        Ok(hex::encode(signature))
    }

    fn verify(
        &self,
        alg: AlgorithmId,
        signing_input: &[u8],
        signature_hex: &str,
        key: &Key,
    ) -> JwtResult<bool> {
        ensure_supported(self, alg)?;
        let public_key = key.require_rsa_public(alg)?;
        // only the lowercase form is ever issued; hex::decode alone would
        // let a case change in the segment verify
        if !is_lowercase_hex(signature_hex) {
            return Ok(false);
        }
        let Ok(signature) = hex::decode(signature_hex) else {
            return Ok(false);
        };
        let Some(salt_len) = max_salt_len(&public_key, alg) else {
            return Ok(false);
        };
        let (hashed, scheme) = prepare(alg, signing_input, salt_len)?;
        match public_key.verify(scheme, &hashed, &signature) {
            Ok(()) => Ok(true),
            Err(_) => {
                tracing::trace!(%alg, "rsa-pss signature rejected");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use rsa::RsaPrivateKey;

    static PRIVATE_KEY: Lazy<RsaPrivateKey> =
        Lazy::new(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("generate test key"));

    #[test]
    fn test_max_salt_len_2048() {
        let public_key = PRIVATE_KEY.to_public_key();
        assert_eq!(max_salt_len(&public_key, AlgorithmId::RS256), Some(222));
        assert_eq!(max_salt_len(&public_key, AlgorithmId::RS384), Some(206));
        assert_eq!(max_salt_len(&public_key, AlgorithmId::RS512), Some(190));
    }

    #[test]
    fn test_sign_verify_each_hash() {
        let signer = Key::from(PRIVATE_KEY.clone());
        let verifier = Key::from(PRIVATE_KEY.to_public_key());
        for alg in [AlgorithmId::RS256, AlgorithmId::RS384, AlgorithmId::RS512] {
            let sig = RsaPssAlgorithm.sign(alg, b"head.body", &signer).unwrap();
            assert_eq!(sig.len(), 512);
            assert!(RsaPssAlgorithm.verify(alg, b"head.body", &sig, &verifier).unwrap());
            assert!(!RsaPssAlgorithm.verify(alg, b"head.bodY", &sig, &verifier).unwrap());
        }
    }

    #[test]
    fn test_signatures_are_randomized() {
        let signer = Key::from(PRIVATE_KEY.clone());
        let a = RsaPssAlgorithm.sign(AlgorithmId::RS256, b"x", &signer).unwrap();
        let b = RsaPssAlgorithm.sign(AlgorithmId::RS256, b"x", &signer).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_crypto_faults_become_false() {
        let signer = Key::from(PRIVATE_KEY.clone());
        let verifier = Key::from(PRIVATE_KEY.to_public_key());
        let sig = RsaPssAlgorithm.sign(AlgorithmId::RS256, b"x", &signer).unwrap();

        assert!(!RsaPssAlgorithm.verify(AlgorithmId::RS256, b"x", "zz", &verifier).unwrap());
        assert!(!RsaPssAlgorithm.verify(AlgorithmId::RS256, b"x", "00ff", &verifier).unwrap());
        assert!(!RsaPssAlgorithm.verify(AlgorithmId::RS384, b"x", &sig, &verifier).unwrap());
    }

    #[test]
    fn test_uppercase_signature_is_rejected() {
        let signer = Key::from(PRIVATE_KEY.clone());
        let verifier = Key::from(PRIVATE_KEY.to_public_key());
        let sig = RsaPssAlgorithm.sign(AlgorithmId::RS256, b"x", &signer).unwrap();
        assert!(RsaPssAlgorithm.verify(AlgorithmId::RS256, b"x", &sig, &verifier).unwrap());

        // same signature bytes, one hex letter in the other case
        let pos = sig.find(|c: char| c.is_ascii_alphabetic()).unwrap();
        let mut mixed = sig.clone();
        mixed.replace_range(pos..=pos, &sig[pos..=pos].to_ascii_uppercase());
        assert_eq!(hex::decode(&mixed).unwrap(), hex::decode(&sig).unwrap());
        assert!(!RsaPssAlgorithm.verify(AlgorithmId::RS256, b"x", &mixed, &verifier).unwrap());
        assert!(!RsaPssAlgorithm
            .verify(AlgorithmId::RS256, b"x", &sig.to_ascii_uppercase(), &verifier)
            .unwrap());
    }

    #[test]
    fn test_public_key_cannot_sign() {
        let verifier = Key::from(PRIVATE_KEY.to_public_key());
        assert!(matches!(
            RsaPssAlgorithm.sign(AlgorithmId::RS256, b"x", &verifier),
            Err(JwtError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_secret_rejected() {
        assert!(matches!(
            RsaPssAlgorithm.verify(AlgorithmId::RS256, b"x", "00", &Key::from("secret key")),
            Err(JwtError::InvalidKey(_))
        ));
    }
}
