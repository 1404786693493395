//! Error taxonomy for token building, parsing and verification

use thiserror::Error;

/// Result type for token operations
pub type JwtResult<T> = Result<T, JwtError>;

/// Token errors.
///
/// Every verification failure collapses into [`JwtError::InvalidSignature`],
/// whatever went wrong underneath. Messages never carry key material,
/// payload bytes or signature bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Claims could not be converted to bytes
    #[error("claims marshaling failed: {0}")]
    Marshal(String),

    /// Claims bytes could not be converted back into a claims value
    #[error("claims unmarshaling failed: {0}")]
    Unmarshal(String),

    /// The signing primitive failed or the key cannot sign
    #[error("signing failed: {0}")]
    Signing(String),

    /// Sign was called on a signer constructed without its private half
    #[error("signer holds no private key and can only verify")]
    MissingSigningKey,

    /// Verification failed
    #[error("invalid signature")]
    InvalidSignature,

    /// Compact form did not split into three base64url segments with a readable header
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// Key material rejected at signer construction
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Algorithm identifier is not one this crate implements
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Background worker dropped its result channel
    #[error("background task failed")]
    TaskFailed,
}

impl JwtError {
    /// Create a marshal error
    #[must_use]
    pub fn marshal(msg: impl Into<String>) -> Self {
        Self::Marshal(msg.into())
    }

    /// Create an unmarshal error
    #[must_use]
    pub fn unmarshal(msg: impl Into<String>) -> Self {
        Self::Unmarshal(msg.into())
    }

    /// Create a signing error
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Create a malformed token error
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedToken(msg.into())
    }

    /// Create an invalid key error
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create an unsupported algorithm error
    #[must_use]
    pub fn unsupported_algorithm(alg: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm(alg.into())
    }

    /// Whether this error belongs to the signing side of the taxonomy.
    #[must_use]
    pub fn is_signing_error(&self) -> bool {
        matches!(self, Self::Signing(_) | Self::MissingSigningKey)
    }
}
