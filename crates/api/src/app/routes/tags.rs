use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use foodgram_core::TagId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_tags))
        .route("/:id", get(get_tag))
}

pub async fn list_tags(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.store().list_tags().await {
        Ok(tags) => (
            StatusCode::OK,
            Json(tags.iter().map(dto::tag_to_json).collect::<Vec<_>>()),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_tag(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TagId = match dto::parse_id(&id, "tag") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().get_tag(id).await {
        Ok(Some(t)) => (StatusCode::OK, Json(dto::tag_to_json(&t))).into_response(),
        Ok(None) => errors::not_found("tag"),
        Err(e) => errors::store_error_to_response(e),
    }
}
