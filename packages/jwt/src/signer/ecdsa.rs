//! ECDSA signers (ES256 on P-256, ES384 on P-384, ES512 on P-521)
//!
//! Signatures use the fixed-width `r || s` encoding of RFC 7518 section 3.4
//! (64, 96 and 132 bytes), not ASN.1 DER. Signing is hedged: RFC 6979
//! nonces mixed with fresh OS randomness.

use super::{Signer, missing_signing_key, verify_bound};
use crate::{
    algorithm::Algorithm,
    error::{JwtError, JwtResult},
    keys,
};
use p256::ecdsa::signature::{RandomizedSigner, Verifier};
use rand_core::OsRng;
use std::fmt;
use subtle::Choice;

#[derive(Clone)]
enum EcKeys {
    P256 {
        verifying: p256::ecdsa::VerifyingKey,
        signing: Option<p256::ecdsa::SigningKey>,
    },
    P384 {
        verifying: p384::ecdsa::VerifyingKey,
        signing: Option<p384::ecdsa::SigningKey>,
    },
    P521 {
        verifying: p521::ecdsa::VerifyingKey,
        signing: Option<p521::ecdsa::SigningKey>,
    },
}

/// Asymmetric ECDSA signer. Holds the verifying key and optionally the
/// signing key; without the signing key it can only verify.
#[derive(Clone)]
pub struct EcdsaSigner {
    alg: Algorithm,
    keys: EcKeys,
}

fn pick_verifying<K>(
    verifying: Option<K>,
    derived: Option<K>,
    same: impl Fn(&K, &K) -> bool,
) -> JwtResult<K> {
    match (verifying, derived) {
        (Some(given), Some(derived)) => {
            if same(&given, &derived) {
                Ok(given)
            } else {
                Err(JwtError::invalid_key(
                    "EC verifying key does not match the signing key",
                ))
            }
        }
        (Some(given), None) => Ok(given),
        (None, Some(derived)) => Ok(derived),
        (None, None) => Err(JwtError::invalid_key("EC signer needs at least one key half")),
    }
}

impl EcdsaSigner {
    /// ES256 signer from either or both key halves.
    pub fn es256(
        verifying: Option<p256::ecdsa::VerifyingKey>,
        signing: Option<p256::ecdsa::SigningKey>,
    ) -> JwtResult<Self> {
        let derived = signing.as_ref().map(p256::ecdsa::VerifyingKey::from);
        let verifying = pick_verifying(verifying, derived, |a, b| {
            a.to_encoded_point(true) == b.to_encoded_point(true)
        })?;
        Ok(Self {
            alg: Algorithm::Es256,
            keys: EcKeys::P256 { verifying, signing },
        })
    }

    /// ES384 signer from either or both key halves.
    pub fn es384(
        verifying: Option<p384::ecdsa::VerifyingKey>,
        signing: Option<p384::ecdsa::SigningKey>,
    ) -> JwtResult<Self> {
        let derived = signing.as_ref().map(p384::ecdsa::VerifyingKey::from);
        let verifying = pick_verifying(verifying, derived, |a, b| {
            a.to_encoded_point(true) == b.to_encoded_point(true)
        })?;
        Ok(Self {
            alg: Algorithm::Es384,
            keys: EcKeys::P384 { verifying, signing },
        })
    }

    /// ES512 signer from either or both key halves.
    pub fn es512(
        verifying: Option<p521::ecdsa::VerifyingKey>,
        signing: Option<p521::ecdsa::SigningKey>,
    ) -> JwtResult<Self> {
        let derived = signing.as_ref().map(p521::ecdsa::VerifyingKey::from);
        let verifying = pick_verifying(verifying, derived, |a, b| {
            a.to_encoded_point(true) == b.to_encoded_point(true)
        })?;
        Ok(Self {
            alg: Algorithm::Es512,
            keys: EcKeys::P521 { verifying, signing },
        })
    }

    /// Whether this signer can sign.
    #[must_use]
    pub fn can_sign(&self) -> bool {
        match &self.keys {
            EcKeys::P256 { signing, .. } => signing.is_some(),
            EcKeys::P384 { signing, .. } => signing.is_some(),
            EcKeys::P521 { signing, .. } => signing.is_some(),
        }
    }

    /// Verify-only copy of this signer.
    #[must_use]
    pub fn to_verifier(&self) -> Self {
        let keys = match &self.keys {
            EcKeys::P256 { verifying, .. } => EcKeys::P256 {
                verifying: verifying.clone(),
                signing: None,
            },
            EcKeys::P384 { verifying, .. } => EcKeys::P384 {
                verifying: verifying.clone(),
                signing: None,
            },
            EcKeys::P521 { verifying, .. } => EcKeys::P521 {
                verifying: verifying.clone(),
                signing: None,
            },
        };
        Self {
            alg: self.alg,
            keys,
        }
    }
}

impl fmt::Debug for EcdsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaSigner")
            .field("alg", &self.alg)
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

fn signing_failed(e: impl fmt::Display) -> JwtError {
    JwtError::signing(format!("ECDSA signing failed: {e}"))
}

impl Signer for EcdsaSigner {
    fn algorithm(&self) -> Algorithm {
        self.alg
    }

    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        let missing = || missing_signing_key(self.alg);
        match &self.keys {
            EcKeys::P256 { signing, .. } => {
                let key = signing.as_ref().ok_or_else(missing)?;
                let signature: p256::ecdsa::Signature = key
                    .try_sign_with_rng(&mut OsRng, payload)
                    .map_err(signing_failed)?;
                Ok(signature.to_bytes().to_vec())
            }
            EcKeys::P384 { signing, .. } => {
                let key = signing.as_ref().ok_or_else(missing)?;
                let signature: p384::ecdsa::Signature = key
                    .try_sign_with_rng(&mut OsRng, payload)
                    .map_err(signing_failed)?;
                Ok(signature.to_bytes().to_vec())
            }
            EcKeys::P521 { signing, .. } => {
                let key = signing.as_ref().ok_or_else(missing)?;
                let signature: p521::ecdsa::Signature = key
                    .try_sign_with_rng(&mut OsRng, payload)
                    .map_err(signing_failed)?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> JwtResult<()> {
        let expected_len = keys::fixed_signature_len(self.alg).unwrap_or_default();
        verify_bound(
            self.alg,
            payload,
            signature,
            expected_len,
            |payload, signature| {
                let valid = match &self.keys {
                    EcKeys::P256 { verifying, .. } => p256::ecdsa::Signature::from_slice(signature)
                        .is_ok_and(|sig| verifying.verify(payload, &sig).is_ok()),
                    EcKeys::P384 { verifying, .. } => p384::ecdsa::Signature::from_slice(signature)
                        .is_ok_and(|sig| verifying.verify(payload, &sig).is_ok()),
                    EcKeys::P521 { verifying, .. } => p521::ecdsa::Signature::from_slice(signature)
                        .is_ok_and(|sig| verifying.verify(payload, &sig).is_ok()),
                };
                Choice::from(u8::from(valid))
            },
        )
    }
}
