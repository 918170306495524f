use axum::Router;

pub mod cart;
pub mod common;
pub mod favorites;
pub mod ingredients;
pub mod recipes;
pub mod subscriptions;
pub mod system;
pub mod tags;
pub mod users;

/// Router for all resource endpoints (auth is enforced per handler).
pub fn router() -> Router {
    Router::new()
        .nest("/ingredients", ingredients::router())
        .nest("/tags", tags::router())
        .nest("/recipes", recipes::router())
        .nest("/users", users::router().merge(subscriptions::router()))
}
