use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use foodgram_core::DomainError;
use foodgram_infra::store::StoreError;

/// Map a store failure on a relation table (cart, favorites, subscriptions).
///
/// A missing pair is a client error here; missing recipes and authors are
/// checked by the handlers first and answered with 404.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::DuplicateEntry(msg) => json_error(StatusCode::BAD_REQUEST, "duplicate_entry", msg),
        StoreError::NotFound(msg) => json_error(StatusCode::BAD_REQUEST, "not_found", msg),
        StoreError::Unavailable(msg) => {
            tracing::error!(error = %msg, "store unavailable");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_unavailable",
                "failed to retrieve data",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        DomainError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, "duplicate_entry", msg),
        DomainError::Forbidden(msg) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
    }
}

pub fn not_found(what: &str) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
