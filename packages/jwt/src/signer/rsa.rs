//! RSA signers: PKCS#1 v1.5 (RS256, RS384, RS512) and PSS (PS256, PS384, PS512)
//!
//! Signatures are big-endian integers left-padded to the modulus width.
//! Private-key operations are blinded with the OS RNG. PSS uses a salt as
//! long as the digest.

use super::{Signer, missing_signing_key, verify_bound};
use crate::{
    algorithm::{Algorithm, Family, HashStrength},
    error::{JwtError, JwtResult},
    keys,
};
use rand_core::OsRng;
use rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey, traits::PublicKeyParts};
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use subtle::Choice;

/// Asymmetric RSA signer. Holds the public half and optionally the private
/// half; without the private half it can only verify.
#[derive(Clone)]
pub struct RsaSigner {
    alg: Algorithm,
    public: RsaPublicKey,
    private: Option<RsaPrivateKey>,
}

impl RsaSigner {
    /// RSA signer for `alg` from either or both key halves. A missing
    /// public half is derived from the private half; when both are given
    /// they must belong together.
    pub fn new(
        alg: Algorithm,
        public: Option<RsaPublicKey>,
        private: Option<RsaPrivateKey>,
    ) -> JwtResult<Self> {
        if !matches!(alg.family(), Family::RsaPkcs1v15 | Family::RsaPss) {
            return Err(JwtError::invalid_key(format!("{alg} is not an RSA algorithm")));
        }

        if let Some(private) = &private {
            private
                .validate()
                .map_err(|e| JwtError::invalid_key(format!("RSA private key rejected: {e}")))?;
        }

        let public = match (public, &private) {
            (Some(public), Some(private)) => {
                if RsaPublicKey::from(private) != public {
                    return Err(JwtError::invalid_key(
                        "RSA public key does not match the private key",
                    ));
                }
                public
            }
            (Some(public), None) => public,
            (None, Some(private)) => RsaPublicKey::from(private),
            (None, None) => {
                return Err(JwtError::invalid_key("RSA signer needs at least one key half"));
            }
        };

        keys::validate_rsa_modulus(public.size())?;

        Ok(Self {
            alg,
            public,
            private,
        })
    }

    /// Signer that can both sign and verify.
    pub fn from_private_key(alg: Algorithm, private: RsaPrivateKey) -> JwtResult<Self> {
        Self::new(alg, None, Some(private))
    }

    /// Verify-only signer.
    pub fn from_public_key(alg: Algorithm, public: RsaPublicKey) -> JwtResult<Self> {
        Self::new(alg, Some(public), None)
    }

    /// RS256 signer.
    pub fn rs256(public: Option<RsaPublicKey>, private: Option<RsaPrivateKey>) -> JwtResult<Self> {
        Self::new(Algorithm::Rs256, public, private)
    }

    /// RS384 signer.
    pub fn rs384(public: Option<RsaPublicKey>, private: Option<RsaPrivateKey>) -> JwtResult<Self> {
        Self::new(Algorithm::Rs384, public, private)
    }

    /// RS512 signer.
    pub fn rs512(public: Option<RsaPublicKey>, private: Option<RsaPrivateKey>) -> JwtResult<Self> {
        Self::new(Algorithm::Rs512, public, private)
    }

    /// PS256 signer.
    pub fn ps256(public: Option<RsaPublicKey>, private: Option<RsaPrivateKey>) -> JwtResult<Self> {
        Self::new(Algorithm::Ps256, public, private)
    }

    /// PS384 signer.
    pub fn ps384(public: Option<RsaPublicKey>, private: Option<RsaPrivateKey>) -> JwtResult<Self> {
        Self::new(Algorithm::Ps384, public, private)
    }

    /// PS512 signer.
    pub fn ps512(public: Option<RsaPublicKey>, private: Option<RsaPrivateKey>) -> JwtResult<Self> {
        Self::new(Algorithm::Ps512, public, private)
    }

    /// Modulus width in bytes, which is also the signature width.
    #[must_use]
    pub fn modulus_len(&self) -> usize {
        self.public.size()
    }

    /// Public half.
    #[must_use]
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Whether this signer can sign.
    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.private.is_some()
    }
}

fn pkcs1v15_scheme(hash: HashStrength) -> Pkcs1v15Sign {
    match hash {
        HashStrength::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashStrength::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashStrength::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

fn pss_signing_scheme(hash: HashStrength) -> Pss {
    match hash {
        HashStrength::Sha256 => Pss::new_blinded::<Sha256>(),
        HashStrength::Sha384 => Pss::new_blinded::<Sha384>(),
        HashStrength::Sha512 => Pss::new_blinded::<Sha512>(),
    }
}

fn pss_verifying_scheme(hash: HashStrength) -> Pss {
    match hash {
        HashStrength::Sha256 => Pss::new::<Sha256>(),
        HashStrength::Sha384 => Pss::new::<Sha384>(),
        HashStrength::Sha512 => Pss::new::<Sha512>(),
    }
}

impl fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigner")
            .field("alg", &self.alg)
            .field("modulus_bits", &(self.public.size() * 8))
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

impl Signer for RsaSigner {
    fn algorithm(&self) -> Algorithm {
        self.alg
    }

    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        let private = self
            .private
            .as_ref()
            .ok_or_else(|| missing_signing_key(self.alg))?;

        let hash = self.alg.hash();
        let hashed = hash.digest(payload);
        let signature = match self.alg.family() {
            Family::RsaPss => private.sign_with_rng(&mut OsRng, pss_signing_scheme(hash), &hashed),
            _ => private.sign_with_rng(&mut OsRng, pkcs1v15_scheme(hash), &hashed),
        }
        .map_err(|e| JwtError::signing(format!("RSA signing failed: {e}")))?;

        Ok(signature)
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> JwtResult<()> {
        verify_bound(
            self.alg,
            payload,
            signature,
            self.modulus_len(),
            |payload, signature| {
                let hash = self.alg.hash();
                let hashed = hash.digest(payload);
                let result = match self.alg.family() {
                    Family::RsaPss => {
                        self.public
                            .verify(pss_verifying_scheme(hash), &hashed, signature)
                    }
                    _ => self.public.verify(pkcs1v15_scheme(hash), &hashed, signature),
                };
                Choice::from(u8::from(result.is_ok()))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_payload;
    use once_cell::sync::Lazy;

    static KEY: Lazy<RsaPrivateKey> = Lazy::new(|| RsaPrivateKey::new(&mut OsRng, 2048).unwrap());
    static OTHER: Lazy<RsaPrivateKey> =
        Lazy::new(|| RsaPrivateKey::new(&mut OsRng, 2048).unwrap());

    #[test]
    fn signature_is_modulus_width() {
        for alg in [Algorithm::Rs256, Algorithm::Ps512] {
            let signer = RsaSigner::from_private_key(alg, KEY.clone()).unwrap();
            let payload = encode_payload(alg, b"{}");
            let signature = signer.sign(&payload).unwrap();
            assert_eq!(signature.len(), 256);
            assert_eq!(signer.modulus_len(), 256);
            signer.verify(&payload, &signature).unwrap();
        }
    }

    #[test]
    fn verify_only_signer_refuses_to_sign() {
        let signer =
            RsaSigner::from_public_key(Algorithm::Rs256, RsaPublicKey::from(&*KEY)).unwrap();
        assert!(!signer.can_sign());
        let payload = encode_payload(Algorithm::Rs256, b"{}");
        assert_eq!(signer.sign(&payload), Err(JwtError::MissingSigningKey));
    }

    #[test]
    fn mismatched_halves_are_rejected() {
        let result = RsaSigner::rs256(Some(RsaPublicKey::from(&*OTHER)), Some(KEY.clone()));
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
        assert!(RsaSigner::rs256(None, None).is_err());
    }

    #[test]
    fn small_modulus_is_rejected() {
        let small = RsaPrivateKey::new(&mut OsRng, 1024).unwrap();
        assert!(matches!(
            RsaSigner::from_private_key(Algorithm::Rs256, small),
            Err(JwtError::InvalidKey(_))
        ));
    }

    #[test]
    fn non_rsa_algorithm_is_rejected() {
        assert!(RsaSigner::from_private_key(Algorithm::Es256, KEY.clone()).is_err());
    }

    #[test]
    fn pkcs1_and_pss_do_not_cross_verify() {
        let rs = RsaSigner::from_private_key(Algorithm::Rs256, KEY.clone()).unwrap();
        let ps = RsaSigner::from_private_key(Algorithm::Ps256, KEY.clone()).unwrap();
        let payload = encode_payload(Algorithm::Ps256, b"{}");
        let signature = rs.sign(&payload).unwrap();
        assert_eq!(ps.verify(&payload, &signature), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn debug_hides_key_material() {
        let signer = RsaSigner::from_private_key(Algorithm::Rs384, KEY.clone()).unwrap();
        let rendered = format!("{signer:?}");
        assert!(rendered.contains("modulus_bits: 2048"));
        assert!(!rendered.contains("primes"));
    }
}
