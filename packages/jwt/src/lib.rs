//! Compact signed tokens (JWS compact serialization)
//!
//! This crate provides:
//! - HS256/384/512, RS256/384/512, PS256/384/512 and ES256/384/512 signers
//! - A canonical, injective payload encoding
//! - Token building and compact parsing
//! - Verification bound to the algorithm named in the header
//! - Async offload of the heavy key operations onto tokio's blocking pool
//!
//! ```no_run
//! use cryypt_jws::{Hmac, StandardClaims, TokenBuilder, Verifier, VerifierOptions};
//!
//! # fn main() -> cryypt_jws::JwtResult<()> {
//! let secret = vec![0x42; 32];
//! let builder = TokenBuilder::new(Hmac::hs256(secret.clone())?);
//! let compact = builder.build(&StandardClaims::with_subject("u1"))?.compact();
//!
//! let verifier = Verifier::new(VerifierOptions::default()).with_signer(Hmac::hs256(secret)?);
//! let claims: StandardClaims = verifier.decode(&compact)?;
//! assert_eq!(claims.sub.as_deref(), Some("u1"));
//! # Ok(())
//! # }
//! ```

pub mod algorithm;
mod builder;
pub mod claims;
pub mod encoding;
mod error;
mod futures;
pub mod keys;
pub mod signer;
mod token;
mod validation;
mod verifier;

pub use algorithm::{Algorithm, Family, HashStrength};
pub use builder::TokenBuilder;
pub use claims::{ClaimsMarshaler, ClaimsUnmarshaler, Json, StandardClaims};
pub use encoding::Header;
pub use error::*;
pub use futures::{TokenBuildFuture, TokenVerifyFuture};
pub use signer::{EcdsaSigner, Hmac, RsaSigner, Signer};
pub use token::Token;
pub use validation::{DEFAULT_MAX_TOKEN_LEN, VerifierOptions};
pub use verifier::Verifier;
