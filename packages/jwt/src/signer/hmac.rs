//! HMAC-SHA signers (HS256, HS384, HS512)

use super::{Signer, verify_bound};
use crate::{
    algorithm::{Algorithm, Family, HashStrength},
    error::{JwtError, JwtResult},
    keys,
};
use hmac::Mac;
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

type HmacSha256 = hmac::Hmac<Sha256>;
type HmacSha384 = hmac::Hmac<Sha384>;
type HmacSha512 = hmac::Hmac<Sha512>;

/// Symmetric signer. The one secret both signs and verifies.
#[derive(Clone)]
pub struct Hmac {
    alg: Algorithm,
    secret: Zeroizing<Vec<u8>>,
}

impl Hmac {
    /// HMAC signer for `alg`. The secret must be at least as long as the
    /// digest.
    pub fn new(alg: Algorithm, secret: impl Into<Vec<u8>>) -> JwtResult<Self> {
        if alg.family() != Family::Hmac {
            return Err(JwtError::invalid_key(format!(
                "{alg} is not an HMAC algorithm"
            )));
        }
        let secret = Zeroizing::new(secret.into());
        keys::validate_hmac_secret(&secret, alg)?;
        Ok(Self { alg, secret })
    }

    /// HS256 signer.
    pub fn hs256(secret: impl Into<Vec<u8>>) -> JwtResult<Self> {
        Self::new(Algorithm::Hs256, secret)
    }

    /// HS384 signer.
    pub fn hs384(secret: impl Into<Vec<u8>>) -> JwtResult<Self> {
        Self::new(Algorithm::Hs384, secret)
    }

    /// HS512 signer.
    pub fn hs512(secret: impl Into<Vec<u8>>) -> JwtResult<Self> {
        Self::new(Algorithm::Hs512, secret)
    }

    fn mac(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        // new_from_slice only fails for fixed-size keys; HMAC accepts any length
        let tag = match self.alg.hash() {
            HashStrength::Sha256 => {
                let mut mac = HmacSha256::new_from_slice(&self.secret)
                    .map_err(|_| JwtError::signing("HMAC key rejected"))?;
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
            HashStrength::Sha384 => {
                let mut mac = HmacSha384::new_from_slice(&self.secret)
                    .map_err(|_| JwtError::signing("HMAC key rejected"))?;
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
            HashStrength::Sha512 => {
                let mut mac = HmacSha512::new_from_slice(&self.secret)
                    .map_err(|_| JwtError::signing("HMAC key rejected"))?;
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
        };
        Ok(tag)
    }
}

impl fmt::Debug for Hmac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hmac")
            .field("alg", &self.alg)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Signer for Hmac {
    fn algorithm(&self) -> Algorithm {
        self.alg
    }

    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        self.mac(payload)
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> JwtResult<()> {
        verify_bound(
            self.alg,
            payload,
            signature,
            self.alg.hash().output_len(),
            |payload, signature| match self.mac(payload) {
                Ok(expected) => expected.as_slice().ct_eq(signature),
                Err(_) => Choice::from(0),
            },
        )
    }
}
