use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use foodgram_core::UserId;

/// JWT claims model (transport-agnostic).
///
/// The minimal set of claims the service expects once a token has been
/// decoded and its signature verified. Tokens are minted by the identity
/// service, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the authenticated user.
    pub sub: UserId,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Tolerated clock difference between the token issuer and this service.
pub const CLOCK_SKEW_LEEWAY_SECS: i64 = 30;

/// Deterministically validate JWT claims against `now`.
///
/// Validates the *claims* only; signature verification happens in
/// [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now + Duration::seconds(CLOCK_SKEW_LEEWAY_SECS) < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(issued_offset: i64, ttl: i64) -> (JwtClaims, DateTime<Utc>) {
        let now = Utc::now();
        let issued_at = now + Duration::minutes(issued_offset);
        (
            JwtClaims {
                sub: UserId::new(),
                issued_at,
                expires_at: issued_at + Duration::minutes(ttl),
            },
            now,
        )
    }

    #[test]
    fn accepts_token_inside_window() {
        let (c, now) = claims(-1, 10);
        assert_eq!(validate_claims(&c, now), Ok(()));
    }

    #[test]
    fn rejects_expired_token() {
        let (c, now) = claims(-20, 10);
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));
    }

    #[test]
    fn rejects_future_token() {
        let (c, now) = claims(5, 10);
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn tolerates_small_issuer_clock_skew() {
        let now = Utc::now();
        let issued_at = now + Duration::seconds(10);
        let c = JwtClaims {
            sub: UserId::new(),
            issued_at,
            expires_at: issued_at + Duration::minutes(10),
        };
        assert_eq!(validate_claims(&c, now), Ok(()));

        let c = JwtClaims {
            issued_at: now + Duration::seconds(CLOCK_SKEW_LEEWAY_SECS + 5),
            ..c
        };
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn rejects_inverted_window() {
        let (c, now) = claims(-1, -5);
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
