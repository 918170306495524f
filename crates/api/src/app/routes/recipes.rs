use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use foodgram_core::RecipeId;
use foodgram_recipes::Recipe;

use crate::app::routes::{cart, common, favorites};
use crate::app::extract::{ApiJson, ApiQuery};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz::require_author;
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/download_shopping_cart", get(cart::download_shopping_cart))
        .route(
            "/:id",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/:id/favorite",
            post(favorites::add_favorite).delete(favorites::remove_favorite),
        )
        .route(
            "/:id/shopping_cart",
            post(cart::add_to_cart).delete(cart::remove_from_cart),
        )
}

/// Publication-ordered listing with `tags`, `author`, `is_favorited` and
/// `is_in_shopping_cart` filters.
pub async fn list_recipes(
    Extension(services): Extension<Arc<AppServices>>,
    viewer: Option<UserContext>,
    ApiQuery(pairs): ApiQuery<Vec<(String, String)>>,
) -> axum::response::Response {
    let filter = match dto::parse_recipe_filter(&pairs) {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    let view = match services.viewer_state(viewer.map(|v| v.user_id())).await {
        Ok(v) => v,
        Err(e) => return errors::store_error_to_response(e),
    };

    match services.list_recipes(&view, &filter).await {
        Ok(recipes) => (
            StatusCode::OK,
            Json(recipes.iter().map(dto::recipe_to_json).collect::<Vec<_>>()),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    viewer: Option<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let recipe = match common::load_recipe(&services, &id).await {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    common::recipe_response(&services, viewer.map(|v| v.user_id()), recipe, StatusCode::OK).await
}

pub async fn create_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
    ApiJson(body): ApiJson<dto::RecipeRequest>,
) -> axum::response::Response {
    let draft = match body.into_draft() {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let recipe = match Recipe::publish(RecipeId::new(), user.user_id(), draft, Utc::now()) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(resp) = common::check_references(&services, &recipe).await {
        return resp;
    }

    if let Err(e) = services.store().insert_recipe(recipe.clone()).await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(recipe_id = %recipe.id, author = %recipe.author, "recipe published");
    common::recipe_response(&services, Some(user.user_id()), recipe, StatusCode::CREATED).await
}

pub async fn update_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::RecipeRequest>,
) -> axum::response::Response {
    let mut recipe = match common::load_recipe(&services, &id).await {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    if let Err(resp) = require_author(&user, &recipe) {
        return resp;
    }

    let draft = match body.into_draft() {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    if let Err(e) = recipe.revise(draft) {
        return errors::domain_error_to_response(e);
    }

    if let Err(resp) = common::check_references(&services, &recipe).await {
        return resp;
    }

    match services.store().update_recipe(recipe.clone()).await {
        Ok(()) => {}
        // Deleted concurrently.
        Err(foodgram_infra::store::StoreError::NotFound(_)) => return errors::not_found("recipe"),
        Err(e) => return errors::store_error_to_response(e),
    }

    tracing::info!(recipe_id = %recipe.id, "recipe revised");
    common::recipe_response(&services, Some(user.user_id()), recipe, StatusCode::OK).await
}

pub async fn delete_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
    Path(id): Path<String>,
) -> axum::response::Response {
    let recipe = match common::load_recipe(&services, &id).await {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    if let Err(resp) = require_author(&user, &recipe) {
        return resp;
    }

    match services.store().delete_recipe(recipe.id).await {
        Ok(()) => {
            tracing::info!(recipe_id = %recipe.id, "recipe deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(foodgram_infra::store::StoreError::NotFound(_)) => errors::not_found("recipe"),
        Err(e) => errors::store_error_to_response(e),
    }
}
