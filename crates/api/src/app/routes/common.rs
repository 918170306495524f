//! Helpers shared by the route modules.

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, Json};

use foodgram_core::{RecipeId, UserId};
use foodgram_recipes::Recipe;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Parse `raw` and load the recipe, answering 404 when it does not exist.
pub async fn load_recipe(services: &AppServices, raw: &str) -> Result<Recipe, axum::response::Response> {
    let id: RecipeId = dto::parse_id(raw, "recipe")?;
    match services.store().get_recipe(id).await {
        Ok(Some(recipe)) => Ok(recipe),
        Ok(None) => Err(errors::not_found("recipe")),
        Err(e) => Err(errors::store_error_to_response(e)),
    }
}

/// Every tag and ingredient the recipe references must be in the catalog.
pub async fn check_references(services: &AppServices, recipe: &Recipe) -> Result<(), axum::response::Response> {
    let store = services.store();

    for line in &recipe.ingredients {
        match store.get_ingredient(line.ingredient_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "unknown_ingredient",
                    format!("ingredient {} does not exist", line.ingredient_id),
                ));
            }
            Err(e) => return Err(errors::store_error_to_response(e)),
        }
    }

    for tag in &recipe.tags {
        match store.get_tag(*tag).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "unknown_tag",
                    format!("tag {tag} does not exist"),
                ));
            }
            Err(e) => return Err(errors::store_error_to_response(e)),
        }
    }

    Ok(())
}

/// Full recipe representation for `viewer`.
pub async fn recipe_response(
    services: &Arc<AppServices>,
    viewer: Option<UserId>,
    recipe: Recipe,
    status: StatusCode,
) -> axum::response::Response {
    let view = match services.viewer_state(viewer).await {
        Ok(v) => v,
        Err(e) => return errors::store_error_to_response(e),
    };
    let catalog = match services.catalog_for(&recipe).await {
        Ok(c) => c,
        Err(e) => return errors::store_error_to_response(e),
    };
    match services.recipe_details(&view, &catalog, recipe).await {
        Ok(details) => (status, Json(dto::recipe_to_json(&details))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
