//! Key fixtures shared by the integration tests.
//!
//! Two independent key sets, K1 and K2, are generated once per test binary.
//! RSA keys are shared by every RS*/PS* algorithm.

#![allow(dead_code)]

use cryypt_jws::{Algorithm, EcdsaSigner, Family, Hmac, RsaSigner, Signer};
use once_cell::sync::Lazy;
use rand::Rng;
use rand_core::OsRng;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::sync::Arc;

/// Which fixture key set to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    K1,
    K2,
}

struct KeySet {
    hmac: Vec<u8>,
    rsa: RsaPrivateKey,
    p256: p256::ecdsa::SigningKey,
    p384: p384::ecdsa::SigningKey,
    p521: p521::ecdsa::SigningKey,
}

impl KeySet {
    fn generate() -> Self {
        let mut hmac = vec![0u8; 64];
        rand::rng().fill(&mut hmac[..]);
        Self {
            hmac,
            rsa: RsaPrivateKey::new(&mut OsRng, 2048).unwrap(),
            p256: p256::ecdsa::SigningKey::random(&mut OsRng),
            p384: p384::ecdsa::SigningKey::random(&mut OsRng),
            p521: p521::ecdsa::SigningKey::random(&mut OsRng),
        }
    }
}

static K1: Lazy<KeySet> = Lazy::new(KeySet::generate);
static K2: Lazy<KeySet> = Lazy::new(KeySet::generate);

fn keys(key: Key) -> &'static KeySet {
    match key {
        Key::K1 => &K1,
        Key::K2 => &K2,
    }
}

/// Signer holding both halves of `key` for `alg`.
pub fn signer(alg: Algorithm, key: Key) -> Arc<dyn Signer> {
    let keys = keys(key);
    match alg.family() {
        Family::Hmac => Arc::new(Hmac::new(alg, keys.hmac.clone()).unwrap()),
        Family::RsaPkcs1v15 | Family::RsaPss => {
            Arc::new(RsaSigner::from_private_key(alg, keys.rsa.clone()).unwrap())
        }
        Family::Ecdsa => Arc::new(ec_signer(alg, keys, true)),
    }
}

/// Verify-only signer for `key`. HMAC has no public half, so the full
/// signer is returned for the symmetric family.
pub fn verifier(alg: Algorithm, key: Key) -> Arc<dyn Signer> {
    let keys = keys(key);
    match alg.family() {
        Family::Hmac => signer(alg, key),
        Family::RsaPkcs1v15 | Family::RsaPss => {
            Arc::new(RsaSigner::from_public_key(alg, RsaPublicKey::from(&keys.rsa)).unwrap())
        }
        Family::Ecdsa => Arc::new(ec_signer(alg, keys, false)),
    }
}

fn ec_signer(alg: Algorithm, keys: &KeySet, with_private: bool) -> EcdsaSigner {
    let signer = match alg {
        Algorithm::Es256 => EcdsaSigner::es256(None, Some(keys.p256.clone())),
        Algorithm::Es384 => EcdsaSigner::es384(None, Some(keys.p384.clone())),
        Algorithm::Es512 => EcdsaSigner::es512(None, Some(keys.p521.clone())),
        other => panic!("{other} is not an ECDSA algorithm"),
    }
    .unwrap();
    if with_private {
        signer
    } else {
        signer.to_verifier()
    }
}

/// 2048-bit RSA private key K1 or K2.
pub fn rsa_key(key: Key) -> RsaPrivateKey {
    keys(key).rsa.clone()
}

/// Flip bit `bit` of `bytes`, counting from the first byte's low bit.
pub fn flip_bit(bytes: &[u8], bit: usize) -> Vec<u8> {
    let mut flipped = bytes.to_vec();
    flipped[bit / 8] ^= 1 << (bit % 8);
    flipped
}
