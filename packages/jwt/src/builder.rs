//! Token builder: claims → payload → signature → [`Token`]

use crate::{
    claims::ClaimsMarshaler,
    encoding::{self, Header},
    error::{JwtError, JwtResult},
    futures::{TokenBuildFuture, offload},
    signer::Signer,
    token::Token,
};
use std::sync::Arc;

/// Builds tokens with one signer.
///
/// Either a complete, signed [`Token`] comes back or an error does; no
/// partially built value is ever returned.
pub struct TokenBuilder<S: Signer + ?Sized> {
    signer: Arc<S>,
    kid: Option<String>,
    cty: Option<String>,
}

impl<S: Signer> TokenBuilder<S> {
    /// Builder that signs with `signer`.
    pub fn new(signer: S) -> Self {
        Self::from_arc(Arc::new(signer))
    }
}

impl<S: Signer + ?Sized> TokenBuilder<S> {
    /// Builder over a shared signer.
    pub fn from_arc(signer: Arc<S>) -> Self {
        Self {
            signer,
            kid: None,
            cty: None,
        }
    }

    /// Put a key ID hint in every header.
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Put a content type in every header.
    #[must_use]
    pub fn with_content_type(mut self, cty: impl Into<String>) -> Self {
        self.cty = Some(cty.into());
        self
    }

    /// The signer in use.
    #[must_use]
    pub fn signer(&self) -> &S {
        &self.signer
    }

    fn header(&self) -> Header {
        Header {
            kid: self.kid.clone(),
            cty: self.cty.clone(),
            ..Header::new(self.signer.algorithm())
        }
    }

    /// Marshal `claims`, encode the payload under this signer's
    /// identifier, and sign it.
    pub fn build<C: ClaimsMarshaler + ?Sized>(&self, claims: &C) -> JwtResult<Token> {
        let claims = claims.marshal_binary().map_err(|e| match e {
            JwtError::Marshal(_) => e,
            other => JwtError::marshal(other.to_string()),
        })?;
        self.build_bytes(&claims)
    }

    /// Sign already-marshaled claims bytes.
    pub fn build_bytes(&self, claims: &[u8]) -> JwtResult<Token> {
        build_with(&*self.signer, self.header(), claims)
    }

    /// [`build`](Self::build) on tokio's blocking pool.
    pub fn build_async<C>(&self, claims: C) -> TokenBuildFuture
    where
        C: ClaimsMarshaler + Send + 'static,
    {
        let signer = Arc::clone(&self.signer);
        let header = self.header();
        let rx = offload(move || {
            let claims = claims.marshal_binary().map_err(|e| match e {
                JwtError::Marshal(_) => e,
                other => JwtError::marshal(other.to_string()),
            })?;
            build_with(&*signer, header, &claims)
        });
        TokenBuildFuture::new(rx)
    }
}

impl<S: Signer + ?Sized> Clone for TokenBuilder<S> {
    fn clone(&self) -> Self {
        Self {
            signer: Arc::clone(&self.signer),
            kid: self.kid.clone(),
            cty: self.cty.clone(),
        }
    }
}

fn build_with<S: Signer + ?Sized>(signer: &S, header: Header, claims: &[u8]) -> JwtResult<Token> {
    let payload = encoding::payload_string(&header, claims);
    let signature = signer.sign(payload.as_bytes())?;

    tracing::debug!(
        alg = %header.alg,
        claims_len = claims.len(),
        signature_len = signature.len(),
        "token built"
    );

    Ok(Token::from_parts(header, payload, signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algorithm::Algorithm,
        claims::{Json, StandardClaims},
        signer::Hmac,
    };

    fn hs256() -> Hmac {
        Hmac::hs256(vec![7u8; 32]).unwrap()
    }

    struct Unmarshalable;

    impl ClaimsMarshaler for Unmarshalable {
        fn marshal_binary(&self) -> JwtResult<Vec<u8>> {
            Err(JwtError::marshal("cannot encode"))
        }
    }

    struct WrongErrorKind;

    impl ClaimsMarshaler for WrongErrorKind {
        fn marshal_binary(&self) -> JwtResult<Vec<u8>> {
            Err(JwtError::invalid_key("marshaler misreported"))
        }
    }

    #[test]
    fn built_token_verifies_with_its_signer() {
        let builder = TokenBuilder::new(hs256());
        let token = builder.build(&StandardClaims::with_subject("u1")).unwrap();
        assert_eq!(token.algorithm(), Algorithm::Hs256);
        assert_eq!(token.claims_bytes().unwrap(), br#"{"sub":"u1"}"#);
        builder
            .signer()
            .verify(token.payload(), token.signature())
            .unwrap();
    }

    #[test]
    fn marshal_failure_is_reported() {
        let builder = TokenBuilder::new(hs256());
        assert_eq!(
            builder.build(&Unmarshalable),
            Err(JwtError::Marshal("cannot encode".into()))
        );
        assert!(matches!(
            builder.build(&WrongErrorKind),
            Err(JwtError::Marshal(_))
        ));
    }

    #[test]
    fn header_extras_are_signed() {
        let builder = TokenBuilder::new(hs256())
            .with_key_id("2026-10")
            .with_content_type("JWT");
        let token = builder.build(&Json(serde_json::json!({"n": 1}))).unwrap();
        assert_eq!(token.header().kid.as_deref(), Some("2026-10"));
        assert_eq!(token.header().cty.as_deref(), Some("JWT"));

        let parsed = Token::parse(&token.compact()).unwrap();
        assert_eq!(parsed.header(), token.header());
        builder
            .signer()
            .verify(parsed.payload(), parsed.signature())
            .unwrap();
    }

    #[test]
    fn trait_object_signers_build() {
        let signer: Arc<dyn Signer> = Arc::new(hs256());
        let builder = TokenBuilder::from_arc(signer);
        let token = builder.build_bytes(b"raw").unwrap();
        assert_eq!(token.claims_bytes().unwrap(), b"raw");
    }

    #[tokio::test]
    async fn build_async_matches_sync_build() {
        let builder = TokenBuilder::new(hs256());
        let claims = StandardClaims::with_subject("async");
        let sync = builder.build(&claims).unwrap();
        let offloaded = builder.build_async(claims).await.unwrap();
        assert_eq!(sync, offloaded);
    }

    #[test]
    fn build_async_without_runtime_fails_cleanly() {
        let builder = TokenBuilder::new(hs256());
        let future = builder.build_async(StandardClaims::default());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        assert_eq!(runtime.block_on(future), Err(JwtError::TaskFailed));
    }
}
