//! The signing capability and its algorithm families.
//!
//! A [`Signer`] owns immutable key material for exactly one
//! [`Algorithm`]. It signs raw payload bytes and verifies a
//! (payload, signature) pair, refusing payloads whose header names any
//! other algorithm.

mod ecdsa;
mod hmac;
mod rsa;

pub use self::ecdsa::EcdsaSigner;
pub use self::hmac::Hmac;
pub use self::rsa::RsaSigner;

use crate::{
    algorithm::Algorithm,
    encoding,
    error::{JwtError, JwtResult},
};
use std::sync::Arc;
use subtle::Choice;

/// Signing algorithm interface.
///
/// Implementations hold no mutable state, so one instance may be shared
/// across threads and called concurrently.
pub trait Signer: Send + Sync + 'static {
    /// Algorithm this signer implements.
    fn algorithm(&self) -> Algorithm;

    /// Header `alg` value.
    fn identifier(&self) -> &'static str {
        self.algorithm().as_str()
    }

    /// Sign an encoded payload.
    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>>;

    /// Verify `signature` over `payload`. Every failure is
    /// [`JwtError::InvalidSignature`].
    fn verify(&self, payload: &[u8], signature: &[u8]) -> JwtResult<()>;
}

impl<T: Signer + ?Sized> Signer for Arc<T> {
    fn algorithm(&self) -> Algorithm {
        (**self).algorithm()
    }

    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        (**self).sign(payload)
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> JwtResult<()> {
        (**self).verify(payload, signature)
    }
}

impl<T: Signer + ?Sized> Signer for Box<T> {
    fn algorithm(&self) -> Algorithm {
        (**self).algorithm()
    }

    fn sign(&self, payload: &[u8]) -> JwtResult<Vec<u8>> {
        (**self).sign(payload)
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> JwtResult<()> {
        (**self).verify(payload, signature)
    }
}

/// Shared tail of every `verify`: the length gate runs first, then the
/// header binding and the cryptographic check are both evaluated before
/// a single combined decision.
pub(crate) fn verify_bound(
    alg: Algorithm,
    payload: &[u8],
    signature: &[u8],
    expected_len: usize,
    check: impl FnOnce(&[u8], &[u8]) -> Choice,
) -> JwtResult<()> {
    if signature.len() != expected_len {
        return Err(JwtError::InvalidSignature);
    }

    let bound = Choice::from(u8::from(encoding::names_algorithm(payload, alg)));
    let valid = check(payload, signature);

    if bool::from(bound & valid) {
        Ok(())
    } else {
        Err(JwtError::InvalidSignature)
    }
}

/// Error for sign calls on a verify-only signer.
pub(crate) fn missing_signing_key(alg: Algorithm) -> JwtError {
    tracing::warn!(alg = %alg, "sign requested on a verify-only signer");
    JwtError::MissingSigningKey
}
