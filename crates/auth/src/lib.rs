//! `foodgram-auth`: authentication/authorization boundary.
//!
//! Decoupled from HTTP and storage: the API layer extracts a bearer token and
//! hands it to a [`JwtValidator`]; ownership checks are pure functions.

pub mod authorize;
pub mod claims;
pub mod jwt;

pub use authorize::{AuthzError, Principal, authorize_author};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
