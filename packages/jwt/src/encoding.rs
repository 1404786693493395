//! Canonical payload encoding
//!
//! A payload is `base64url(header) "." base64url(claims)` without padding.
//! The separator is outside the base64url alphabet, so the pair
//! (header, claims) is recoverable from the payload and two distinct pairs
//! never encode to the same bytes.

use crate::{
    algorithm::Algorithm,
    error::{JwtError, JwtResult},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Segment separator of payloads and compact tokens.
pub const SEPARATOR: u8 = b'.';

/// Header `typ` written by this crate.
pub const TOKEN_TYPE: &str = "JWT";

/// Token header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Signing algorithm.
    pub alg: Algorithm,
    /// Token type.
    pub typ: Option<String>,
    /// Content type of the claims.
    pub cty: Option<String>,
    /// Key ID hint.
    pub kid: Option<String>,
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
    #[serde(default)]
    typ: Option<String>,
    #[serde(default)]
    cty: Option<String>,
    #[serde(default)]
    kid: Option<String>,
}

impl Header {
    /// Header with the given algorithm and `typ` = `"JWT"`.
    #[must_use]
    pub fn new(alg: Algorithm) -> Self {
        Self {
            alg,
            typ: Some(TOKEN_TYPE.to_string()),
            cty: None,
            kid: None,
        }
    }

    /// Set the key ID hint.
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Set the content type.
    #[must_use]
    pub fn with_content_type(mut self, cty: impl Into<String>) -> Self {
        self.cty = Some(cty.into());
        self
    }

    /// Deterministic JSON form. Keys are emitted in lexicographic order.
    #[must_use]
    pub fn to_json(&self) -> String {
        let mut map = Map::new();
        map.insert("alg".into(), Value::String(self.alg.as_str().into()));
        if let Some(cty) = &self.cty {
            map.insert("cty".into(), Value::String(cty.clone()));
        }
        if let Some(kid) = &self.kid {
            map.insert("kid".into(), Value::String(kid.clone()));
        }
        if let Some(typ) = &self.typ {
            map.insert("typ".into(), Value::String(typ.clone()));
        }
        Value::Object(map).to_string()
    }

    /// Parse header JSON. An unknown `alg` is reported as unsupported,
    /// anything else unreadable as malformed.
    pub fn from_json(json: &[u8]) -> JwtResult<Self> {
        let raw: RawHeader = serde_json::from_slice(json)
            .map_err(|e| JwtError::malformed(format!("header is not valid JSON: {e}")))?;
        Ok(Self {
            alg: raw.alg.parse()?,
            typ: raw.typ,
            cty: raw.cty,
            kid: raw.kid,
        })
    }
}

/// Base64url without padding.
#[inline]
#[must_use]
pub fn base64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Strict base64url decode: no padding, no trailing bits.
#[inline]
pub fn base64url_decode(input: &[u8]) -> JwtResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| JwtError::malformed(format!("segment is not base64url: {e}")))
}

/// Encode `claims` under a default header for `alg`.
#[must_use]
pub fn encode_payload(alg: Algorithm, claims: &[u8]) -> Vec<u8> {
    encode_payload_with_header(&Header::new(alg), claims)
}

/// Encode `claims` under an explicit header.
#[must_use]
pub fn encode_payload_with_header(header: &Header, claims: &[u8]) -> Vec<u8> {
    payload_string(header, claims).into_bytes()
}

pub(crate) fn payload_string(header: &Header, claims: &[u8]) -> String {
    let header_b64 = base64url_encode(header.to_json().as_bytes());
    let claims_b64 = base64url_encode(claims);

    let mut payload = String::with_capacity(header_b64.len() + 1 + claims_b64.len());
    payload.push_str(&header_b64);
    payload.push(char::from(SEPARATOR));
    payload.push_str(&claims_b64);
    payload
}

fn segments(payload: &[u8]) -> JwtResult<(&[u8], &[u8])> {
    let mut parts = payload.split(|b| *b == SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(claims), None) => Ok((header, claims)),
        _ => Err(JwtError::malformed("payload must have exactly two segments")),
    }
}

/// Inverse of [`encode_payload_with_header`].
pub fn split_payload(payload: &[u8]) -> JwtResult<(Header, Vec<u8>)> {
    let (header, claims) = segments(payload)?;
    let header = Header::from_json(&base64url_decode(header)?)?;
    let claims = base64url_decode(claims)?;
    Ok((header, claims))
}

/// Whether `payload` is well formed and its header names `alg`.
#[must_use]
pub fn names_algorithm(payload: &[u8], alg: Algorithm) -> bool {
    let Ok((header, _)) = segments(payload) else {
        return false;
    };
    base64url_decode(header)
        .and_then(|json| Header::from_json(&json))
        .is_ok_and(|header| header.alg == alg)
}
