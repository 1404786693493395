//! Verifier options and configuration.

use serde::{Deserialize, Serialize};

/// Default upper bound on a compact token's length, in bytes.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 8 * 1024;

/// Options for [`Verifier`](crate::Verifier).
///
/// Deserializes from any serde format; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierOptions {
    /// Compact tokens longer than this are rejected before any decoding.
    pub max_token_len: usize,
    /// Required header `typ`, if any.
    pub expected_type: Option<String>,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
            expected_type: None,
        }
    }
}

impl VerifierOptions {
    /// Defaults plus a required `typ` of `"JWT"`.
    #[must_use]
    pub fn strict() -> Self {
        Self::default().expect_type(crate::encoding::TOKEN_TYPE)
    }

    /// Set the compact length limit.
    #[must_use]
    pub fn with_max_token_len(mut self, max: usize) -> Self {
        self.max_token_len = max;
        self
    }

    /// Require a header `typ`.
    #[must_use]
    pub fn expect_type(mut self, typ: impl Into<String>) -> Self {
        self.expected_type = Some(typ.into());
        self
    }
}
