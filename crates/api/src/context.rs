use axum::{extract::FromRequestParts, http::StatusCode, http::request::Parts, response::Response};

use foodgram_auth::Principal;
use foodgram_core::UserId;

use crate::app::errors;

/// Authenticated user for a request.
///
/// Inserted by the auth middleware when a valid bearer token is present.
/// Extracting it on a route makes that route require authentication;
/// `Option<UserContext>` gives optional authentication.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserContext {
    user_id: UserId,
}

impl UserContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user_id,
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<UserContext>().copied().ok_or_else(|| {
            errors::json_error(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "authentication credentials were not provided",
            )
        })
    }
}
