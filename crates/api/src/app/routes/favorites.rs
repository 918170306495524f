use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use foodgram_recipes::FavoriteEntry;

use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::UserContext;

pub async fn add_favorite(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
    Path(id): Path<String>,
) -> axum::response::Response {
    let recipe = match common::load_recipe(&services, &id).await {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let entry = FavoriteEntry {
        user: user.user_id(),
        recipe: recipe.id,
    };
    if let Err(e) = services.store().add_favorite(entry).await {
        return errors::store_error_to_response(e);
    }

    common::recipe_response(&services, Some(user.user_id()), recipe, StatusCode::CREATED).await
}

pub async fn remove_favorite(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
    Path(id): Path<String>,
) -> axum::response::Response {
    let recipe = match common::load_recipe(&services, &id).await {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let entry = FavoriteEntry {
        user: user.user_id(),
        recipe: recipe.id,
    };
    match services.store().remove_favorite(entry).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
