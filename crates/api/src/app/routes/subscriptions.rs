use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use foodgram_core::UserId;
use foodgram_recipes::{Subscription, UserProfile};

use crate::app::extract::ApiQuery;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/subscriptions", get(list_subscriptions))
        .route("/:id/subscribe", post(subscribe).delete(unsubscribe))
}

/// Authors the caller follows, each with (up to `recipes_limit`) recipes.
pub async fn list_subscriptions(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
    ApiQuery(query): ApiQuery<dto::SubscriptionsQuery>,
) -> axum::response::Response {
    let store = services.store();
    let authors = match store.subscriptions_for(user.user_id()).await {
        Ok(a) => a,
        Err(e) => return errors::store_error_to_response(e),
    };

    let mut out = Vec::with_capacity(authors.len());
    for author in authors {
        let profile = match store.get_user(author).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                tracing::warn!(author = %author, "subscribed author has no profile");
                continue;
            }
            Err(e) => return errors::store_error_to_response(e),
        };
        match services.author_details(profile, true, query.recipes_limit).await {
            Ok(details) => out.push(dto::author_to_json(&details)),
            Err(e) => return errors::store_error_to_response(e),
        }
    }

    (StatusCode::OK, Json(out)).into_response()
}

pub async fn subscribe(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<dto::SubscriptionsQuery>,
) -> axum::response::Response {
    let (subscription, profile) = match resolve(&services, &user, &id).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(e) = services.store().subscribe(subscription).await {
        return errors::store_error_to_response(e);
    }
    tracing::info!(user = %subscription.user, author = %subscription.author, "subscribed");

    match services.author_details(profile, true, query.recipes_limit).await {
        Ok(details) => (StatusCode::CREATED, Json(dto::author_to_json(&details))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn unsubscribe(
    Extension(services): Extension<Arc<AppServices>>,
    user: UserContext,
    Path(id): Path<String>,
) -> axum::response::Response {
    let (subscription, _) = match resolve(&services, &user, &id).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().unsubscribe(subscription).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Parse the author id, reject self-subscription, and require a profile.
async fn resolve(
    services: &AppServices,
    user: &UserContext,
    raw: &str,
) -> Result<(Subscription, UserProfile), axum::response::Response> {
    let author: UserId = dto::parse_id(raw, "user")?;
    let subscription =
        Subscription::new(user.user_id(), author).map_err(errors::domain_error_to_response)?;

    match services.store().get_user(author).await {
        Ok(Some(profile)) => Ok((subscription, profile)),
        Ok(None) => Err(errors::not_found("user")),
        Err(e) => Err(errors::store_error_to_response(e)),
    }
}
