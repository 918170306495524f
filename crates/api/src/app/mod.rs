//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the store behind the API and read-side assembly
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: extractors that reject with the error body

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::{Layer, ServiceBuilder};
use tower_http::normalize_path::NormalizePathLayer;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Every route runs behind the auth middleware: a valid token attaches the
/// caller, a bad one is rejected, and no token means an anonymous request.
/// A trailing slash is trimmed before routing, so `/recipes/` is `/recipes`.
pub fn build_app(jwt_secret: String, services: Arc<AppServices>) -> Router {
    let jwt = Arc::new(foodgram_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };

    let api = Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(Extension(services))
                .layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::auth_middleware,
                )),
        );

    Router::new().fallback_service(NormalizePathLayer::trim_trailing_slash().layer(api))
}
