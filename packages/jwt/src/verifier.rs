//! Verification of compact tokens against an allow-list of signers.

use crate::{
    algorithm::Algorithm,
    claims::ClaimsUnmarshaler,
    error::{JwtError, JwtResult},
    futures::{TokenVerifyFuture, offload},
    signer::Signer,
    token::Token,
    validation::VerifierOptions,
};
use std::{collections::BTreeMap, fmt, sync::Arc};

/// Verifies tokens with the signers registered on it.
///
/// The registered signers are the allow-list: a token whose header names
/// an algorithm with no registered signer is rejected, even if some other
/// registered key would accept its bytes.
#[derive(Clone, Default)]
pub struct Verifier {
    signers: BTreeMap<Algorithm, Arc<dyn Signer>>,
    options: VerifierOptions,
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("algorithms", &self.signers.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}

impl Verifier {
    /// Verifier with no signers registered.
    #[must_use]
    pub fn new(options: VerifierOptions) -> Self {
        Self {
            signers: BTreeMap::new(),
            options,
        }
    }

    /// Register `signer` for its algorithm, replacing any earlier one.
    #[must_use]
    pub fn with_signer(self, signer: impl Signer) -> Self {
        self.with_shared_signer(Arc::new(signer))
    }

    /// Register an already shared signer.
    #[must_use]
    pub fn with_shared_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signers.insert(signer.algorithm(), signer);
        self
    }

    /// Algorithms this verifier accepts.
    pub fn algorithms(&self) -> impl Iterator<Item = Algorithm> + '_ {
        self.signers.keys().copied()
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    /// Verify a parsed token.
    pub fn verify(&self, token: &Token) -> JwtResult<()> {
        let alg = token.algorithm();

        if let Some(expected) = &self.options.expected_type {
            if token.header().typ.as_deref() != Some(expected.as_str()) {
                tracing::debug!(alg = %alg, "token rejected: unexpected typ");
                return Err(JwtError::InvalidSignature);
            }
        }

        let Some(signer) = self.signers.get(&alg) else {
            tracing::debug!(alg = %alg, "token rejected: algorithm not allowed");
            return Err(JwtError::InvalidSignature);
        };

        signer
            .verify(token.payload(), token.signature())
            .inspect_err(|_| tracing::debug!(alg = %alg, "token rejected: bad signature"))
    }

    /// Parse and verify a compact token.
    pub fn verify_compact(&self, compact: &str) -> JwtResult<Token> {
        if compact.len() > self.options.max_token_len {
            return Err(JwtError::malformed(format!(
                "token exceeds {} bytes",
                self.options.max_token_len
            )));
        }
        let token = Token::parse(compact)?;
        self.verify(&token)?;
        Ok(token)
    }

    /// Verify a compact token and unmarshal its claims.
    pub fn decode<C: ClaimsUnmarshaler>(&self, compact: &str) -> JwtResult<C> {
        let token = self.verify_compact(compact)?;
        C::unmarshal_binary(&token.claims_bytes()?)
    }

    /// [`verify_compact`](Self::verify_compact) on tokio's blocking pool.
    pub fn verify_compact_async(&self, compact: impl Into<String>) -> TokenVerifyFuture {
        let verifier = self.clone();
        let compact = compact.into();
        TokenVerifyFuture::new(offload(move || verifier.verify_compact(&compact)))
    }
}
