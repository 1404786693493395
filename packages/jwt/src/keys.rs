//! Key-shape rules enforced when signers are constructed

use crate::{
    algorithm::{Algorithm, Family},
    error::{JwtError, JwtResult},
};

/// Smallest RSA modulus accepted, in bits.
pub const MIN_RSA_MODULUS_BITS: usize = 2048;

/// Validate HMAC secret length: at least the digest width of `alg`.
pub(crate) fn validate_hmac_secret(secret: &[u8], alg: Algorithm) -> JwtResult<()> {
    let min_length = alg.hash().output_len();
    if secret.len() < min_length {
        return Err(JwtError::invalid_key(format!(
            "HMAC key for {alg} must be at least {min_length} bytes, got {}",
            secret.len()
        )));
    }
    Ok(())
}

/// Validate an RSA modulus size given in bytes.
pub(crate) fn validate_rsa_modulus(modulus_bytes: usize) -> JwtResult<()> {
    if modulus_bytes * 8 < MIN_RSA_MODULUS_BITS {
        return Err(JwtError::invalid_key(format!(
            "RSA modulus must be at least {MIN_RSA_MODULUS_BITS} bits, got {}",
            modulus_bytes * 8
        )));
    }
    Ok(())
}

/// Recommended key size in bytes: HMAC secret length, RSA modulus length,
/// or EC scalar length.
#[must_use]
pub fn recommended_key_size(alg: Algorithm) -> usize {
    match alg.family() {
        Family::Hmac => alg.hash().output_len(),
        Family::RsaPkcs1v15 | Family::RsaPss => MIN_RSA_MODULUS_BITS / 8,
        Family::Ecdsa => match alg {
            Algorithm::Es256 => 32,
            Algorithm::Es384 => 48,
            _ => 66,
        },
    }
}

/// Length of a signature produced under `alg`, for families whose width
/// does not depend on the key.
#[must_use]
pub fn fixed_signature_len(alg: Algorithm) -> Option<usize> {
    match alg.family() {
        Family::Hmac => Some(alg.hash().output_len()),
        Family::Ecdsa => Some(2 * recommended_key_size(alg)),
        Family::RsaPkcs1v15 | Family::RsaPss => None,
    }
}
