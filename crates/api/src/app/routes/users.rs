use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use foodgram_core::UserId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/:id", get(get_user))
}

/// The caller's own profile; fields are `null` when the directory has no entry.
pub async fn get_me(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
) -> axum::response::Response {
    match services.store().get_user(user.user_id()).await {
        Ok(profile) => (
            StatusCode::OK,
            Json(dto::user_to_json(user.user_id(), profile.as_ref(), false)),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// A user profile with `is_subscribed` relative to the (optional) viewer.
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    viewer: Option<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UserId = match dto::parse_id(&id, "user") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let profile = match services.store().get_user(id).await {
        Ok(Some(p)) => p,
        Ok(None) => return errors::not_found("user"),
        Err(e) => return errors::store_error_to_response(e),
    };

    match services.is_subscribed(viewer.map(|v| v.user_id()), id).await {
        Ok(is_subscribed) => (
            StatusCode::OK,
            Json(dto::user_to_json(id, Some(&profile), is_subscribed)),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
