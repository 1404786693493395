//! Claims capability: conversion between a claims value and the opaque
//! bytes that get signed.

use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Converts claims into the bytes placed in the payload.
pub trait ClaimsMarshaler {
    /// Marshal to bytes. Failures are reported as [`JwtError::Marshal`].
    fn marshal_binary(&self) -> JwtResult<Vec<u8>>;
}

/// Rebuilds claims from payload bytes. Only needed when decoding tokens.
pub trait ClaimsUnmarshaler: Sized {
    /// Unmarshal from bytes. Failures are reported as [`JwtError::Unmarshal`].
    fn unmarshal_binary(bytes: &[u8]) -> JwtResult<Self>;
}

impl<T: ClaimsMarshaler + ?Sized> ClaimsMarshaler for &T {
    fn marshal_binary(&self) -> JwtResult<Vec<u8>> {
        (**self).marshal_binary()
    }
}

/// Registered JWT claim names. Values are carried as-is; nothing here
/// interprets times or audiences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardClaims {
    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aud: Vec<String>,
    /// Expiry (unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not before (unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued-at (unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// JWT ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl StandardClaims {
    /// Claims with only a subject set.
    #[must_use]
    pub fn with_subject(sub: impl Into<String>) -> Self {
        Self {
            sub: Some(sub.into()),
            ..Self::default()
        }
    }
}

impl ClaimsMarshaler for StandardClaims {
    fn marshal_binary(&self) -> JwtResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| JwtError::marshal(e.to_string()))
    }
}

impl ClaimsUnmarshaler for StandardClaims {
    fn unmarshal_binary(bytes: &[u8]) -> JwtResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| JwtError::unmarshal(e.to_string()))
    }
}

/// JSON claims capability for any serde type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwrap the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize> ClaimsMarshaler for Json<T> {
    fn marshal_binary(&self) -> JwtResult<Vec<u8>> {
        serde_json::to_vec(&self.0).map_err(|e| JwtError::marshal(e.to_string()))
    }
}

impl<T: DeserializeOwned> ClaimsUnmarshaler for Json<T> {
    fn unmarshal_binary(bytes: &[u8]) -> JwtResult<Self> {
        serde_json::from_slice(bytes)
            .map(Json)
            .map_err(|e| JwtError::unmarshal(e.to_string()))
    }
}
