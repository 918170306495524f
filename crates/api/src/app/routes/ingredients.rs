use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use foodgram_core::IngredientId;

use crate::app::extract::ApiQuery;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_ingredients))
        .route("/:id", get(get_ingredient))
}

/// Catalog listing; `?name=` narrows to a case-insensitive name prefix.
pub async fn list_ingredients(
    Extension(services): Extension<Arc<AppServices>>,
    ApiQuery(query): ApiQuery<dto::IngredientQuery>,
) -> axum::response::Response {
    let prefix = query.name.as_deref().filter(|n| !n.is_empty());
    match services.store().list_ingredients(prefix).await {
        Ok(items) => (
            StatusCode::OK,
            Json(items.iter().map(dto::ingredient_to_json).collect::<Vec<_>>()),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_ingredient(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: IngredientId = match dto::parse_id(&id, "ingredient") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().get_ingredient(id).await {
        Ok(Some(i)) => (StatusCode::OK, Json(dto::ingredient_to_json(&i))).into_response(),
        Ok(None) => errors::not_found("ingredient"),
        Err(e) => errors::store_error_to_response(e),
    }
}
