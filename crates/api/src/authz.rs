//! API-side ownership guard for recipe mutations.

use axum::{http::StatusCode, response::Response};

use foodgram_auth::authorize_author;
use foodgram_recipes::Recipe;

use crate::app::errors;
use crate::context::UserContext;

/// Allow the request only if the authenticated user wrote `recipe`.
pub fn require_author(user: &UserContext, recipe: &Recipe) -> Result<(), Response> {
    authorize_author(&user.principal(), recipe.author)
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}
