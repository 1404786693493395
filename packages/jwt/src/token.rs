//! Immutable signed token and its compact form

use crate::{
    algorithm::Algorithm,
    encoding::{self, Header, SEPARATOR},
    error::{JwtError, JwtResult},
};
use std::{fmt, str::FromStr};

/// A signed token: header, encoded payload and raw signature.
///
/// Built by [`TokenBuilder`](crate::TokenBuilder) or parsed from a compact
/// string. There are no mutating methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    header: Header,
    payload: String,
    signature: Vec<u8>,
}

impl Token {
    pub(crate) fn from_parts(header: Header, payload: String, signature: Vec<u8>) -> Self {
        Self {
            header,
            payload,
            signature,
        }
    }

    /// Parse the compact form `header.claims.signature`.
    ///
    /// Checks shape only; the signature is not verified here.
    pub fn parse(compact: &str) -> JwtResult<Self> {
        let mut parts = compact.split(char::from(SEPARATOR));
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(JwtError::malformed("expected three segments"));
        };

        let header = Header::from_json(&encoding::base64url_decode(header_b64.as_bytes())?)?;
        encoding::base64url_decode(claims_b64.as_bytes())?;
        let signature = encoding::base64url_decode(signature_b64.as_bytes())?;

        let payload_len = header_b64.len() + 1 + claims_b64.len();
        Ok(Self {
            header,
            payload: compact[..payload_len].to_string(),
            signature,
        })
    }

    /// Algorithm named by the header.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.header.alg
    }

    /// Decoded header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Signed bytes: `base64url(header).base64url(claims)`.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.payload.as_bytes()
    }

    /// Raw signature bytes.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Claims bytes as they were marshaled.
    pub fn claims_bytes(&self) -> JwtResult<Vec<u8>> {
        encoding::split_payload(self.payload()).map(|(_, claims)| claims)
    }

    /// Compact serialized form.
    #[must_use]
    pub fn compact(&self) -> String {
        let signature = encoding::base64url_encode(&self.signature);
        let mut compact = String::with_capacity(self.payload.len() + 1 + signature.len());
        compact.push_str(&self.payload);
        compact.push(char::from(SEPARATOR));
        compact.push_str(&signature);
        compact
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compact())
    }
}

impl FromStr for Token {
    type Err = JwtError;

    fn from_str(s: &str) -> JwtResult<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HS256_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.e30.c2ln";

    #[test]
    fn parse_splits_payload_and_signature() {
        let token = Token::parse(HS256_TOKEN).unwrap();
        assert_eq!(token.algorithm(), Algorithm::Hs256);
        assert_eq!(token.payload(), b"eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.e30");
        assert_eq!(token.signature(), b"sig");
        assert_eq!(token.claims_bytes().unwrap(), b"{}");
        assert_eq!(token.compact(), HS256_TOKEN);
        assert_eq!(token.to_string(), HS256_TOKEN);
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        for input in ["", "a", "a.b", "a.b.c.d", "...."] {
            assert!(
                matches!(Token::parse(input), Err(JwtError::MalformedToken(_))),
                "{input:?}"
            );
        }
    }

    #[test]
    fn bad_base64_is_malformed() {
        let cases = [
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.e30=.c2ln",
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.e30.c2l+",
            "!!.e30.c2ln",
        ];
        for input in cases {
            assert!(
                matches!(Token::parse(input), Err(JwtError::MalformedToken(_))),
                "{input:?}"
            );
        }
    }

    #[test]
    fn header_must_be_json_with_known_alg() {
        let not_json = format!("{}.e30.c2ln", encoding::base64url_encode(b"nope"));
        assert!(matches!(
            Token::parse(&not_json),
            Err(JwtError::MalformedToken(_))
        ));

        let none_alg = format!(
            "{}.e30.",
            encoding::base64url_encode(br#"{"alg":"none","typ":"JWT"}"#)
        );
        assert_eq!(
            none_alg.parse::<Token>(),
            Err(JwtError::UnsupportedAlgorithm("none".into()))
        );
    }

    #[test]
    fn empty_signature_segment_parses() {
        let token = Token::parse("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.e30.").unwrap();
        assert!(token.signature().is_empty());
    }
}
