use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use foodgram_recipes::{CartEntry, SHOPPING_LIST_FILENAME, render};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub async fn add_to_cart(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
    Path(id): Path<String>,
) -> axum::response::Response {
    let recipe = match common::load_recipe(&services, &id).await {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let entry = CartEntry {
        user: user.user_id(),
        recipe: recipe.id,
    };
    if let Err(e) = services.store().add_to_cart(entry).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::recipe_short_to_json(&recipe))).into_response()
}

pub async fn remove_from_cart(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
    Path(id): Path<String>,
) -> axum::response::Response {
    let recipe = match common::load_recipe(&services, &id).await {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let entry = CartEntry {
        user: user.user_id(),
        recipe: recipe.id,
    };
    match services.store().remove_from_cart(entry).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// The caller's aggregated shopping list as a plain-text attachment.
pub async fn download_shopping_cart(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
) -> axum::response::Response {
    let lines = match services.shopping_list(user.user_id()).await {
        Ok(lines) => lines,
        Err(e) => return errors::store_error_to_response(e),
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\""),
            ),
        ],
        render(&lines),
    )
        .into_response()
}
