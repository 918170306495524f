use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use foodgram_api::app::{build_app, AppServices};
use foodgram_auth::JwtClaims;
use foodgram_core::{IngredientId, RecipeId, TagId, UserId};
use foodgram_recipes::{Ingredient, Tag, UserProfile};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over in-memory stores, bound to an ephemeral port.
        let services = Arc::new(AppServices::in_memory());
        let app = build_app(JWT_SECRET.to_string(), services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn ingredient(&self, name: &str, unit: &str) -> Ingredient {
        let ingredient = Ingredient::new(IngredientId::new(), name, unit).unwrap();
        self.services
            .store()
            .insert_ingredient(ingredient.clone())
            .await
            .unwrap();
        ingredient
    }

    async fn tag(&self, name: &str, slug: &str) -> Tag {
        let tag = Tag::new(TagId::new(), name, None, Some(slug.to_string())).unwrap();
        self.services.store().insert_tag(tag.clone()).await.unwrap();
        tag
    }

    async fn profile(&self, username: &str) -> UserId {
        let id = UserId::new();
        self.services
            .store()
            .insert_user(UserProfile {
                id,
                email: format!("{username}@example.com"),
                username: username.to_string(),
                first_name: username.to_string(),
                last_name: "Tester".to_string(),
            })
            .await
            .unwrap();
        id
    }

    /// Publish a recipe as `token`'s user and return its id.
    async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        tag: &Tag,
        lines: &[(&Ingredient, u32)],
    ) -> String {
        let res = self
            .client
            .post(self.url("/recipes"))
            .bearer_auth(token)
            .json(&json!({
                "name": name,
                "text": "Mix everything.",
                "cooking_time": 15,
                "tags": [tag.id.to_string()],
                "ingredients": lines
                    .iter()
                    .map(|(i, amount)| json!({ "id": i.id.to_string(), "amount": amount }))
                    .collect::<Vec<_>>(),
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = res.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(user: UserId) -> String {
    let now = Utc::now();
    mint_claims(&JwtClaims {
        sub: user,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    })
}

fn mint_claims(claims: &JwtClaims) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn download_requires_authentication() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .get(srv.url("/recipes/download_shopping_cart/"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn bad_tokens_are_rejected_even_on_public_routes() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .get(srv.url("/tags"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let now = Utc::now();
    let expired = mint_claims(&JwtClaims {
        sub: UserId::new(),
        issued_at: now - ChronoDuration::hours(2),
        expires_at: now - ChronoDuration::hours(1),
    });
    let res = srv
        .client
        .get(srv.url("/tags"))
        .bearer_auth(expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn shopping_list_download_aggregates_the_cart() {
    let srv = TestServer::spawn().await;
    let flour = srv.ingredient("Flour", "g").await;
    let sugar = srv.ingredient("Sugar", "g").await;
    let tag = srv.tag("Baking", "baking").await;

    let author = mint_jwt(UserId::new());
    let pancakes = srv
        .create_recipe(&author, "Pancakes", &tag, &[(&flour, 200), (&sugar, 50)])
        .await;
    let bread = srv.create_recipe(&author, "Bread", &tag, &[(&flour, 300)]).await;

    let shopper = mint_jwt(UserId::new());
    for id in [&pancakes, &bread] {
        let res = srv
            .client
            .post(srv.url(&format!("/recipes/{id}/shopping_cart")))
            .bearer_auth(&shopper)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["cooking_time"], 15);
    }

    let res = srv
        .client
        .get(srv.url("/recipes/download_shopping_cart/"))
        .bearer_auth(&shopper)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/plain");
    assert_eq!(
        res.headers()["content-disposition"],
        "attachment; filename=\"wishlist.txt\""
    );
    assert_eq!(res.text().await.unwrap(), "Flour - 500 g\nSugar - 50 g\n");

    // The author's own cart is untouched.
    let res = srv
        .client
        .get(srv.url("/recipes/download_shopping_cart/"))
        .bearer_auth(&author)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "");
}

#[tokio::test]
async fn cart_gate_rejects_duplicates_and_missing_pairs() {
    let srv = TestServer::spawn().await;
    let flour = srv.ingredient("Flour", "g").await;
    let tag = srv.tag("Baking", "baking").await;
    let token = mint_jwt(UserId::new());
    let id = srv.create_recipe(&token, "Bread", &tag, &[(&flour, 300)]).await;
    let cart_url = srv.url(&format!("/recipes/{id}/shopping_cart"));

    let first = srv.client.post(&cart_url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = srv.client.post(&cart_url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["error"], "duplicate_entry");

    let removed = srv.client.delete(&cart_url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let again = srv.client.delete(&cart_url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = again.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    let missing = srv
        .client
        .post(srv.url(&format!("/recipes/{}/shopping_cart", RecipeId::new())))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_author_may_change_a_recipe() {
    let srv = TestServer::spawn().await;
    let flour = srv.ingredient("Flour", "g").await;
    let tag = srv.tag("Baking", "baking").await;
    let author = mint_jwt(UserId::new());
    let stranger = mint_jwt(UserId::new());
    let id = srv.create_recipe(&author, "Bread", &tag, &[(&flour, 300)]).await;
    let recipe_url = srv.url(&format!("/recipes/{id}"));

    let update = json!({
        "name": "Better bread",
        "text": "Knead longer.",
        "cooking_time": 90,
        "tags": [tag.id.to_string()],
        "ingredients": [{ "id": flour.id.to_string(), "amount": 400 }],
    });

    let res = srv
        .client
        .patch(&recipe_url)
        .bearer_auth(&stranger)
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv.client.delete(&recipe_url).bearer_auth(&stranger).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .client
        .patch(&recipe_url)
        .bearer_auth(&author)
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Better bread");
    assert_eq!(body["ingredients"][0]["amount"], 400);

    let res = srv.client.delete(&recipe_url).bearer_auth(&author).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv.client.get(&recipe_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recipes_with_unknown_ingredients_are_rejected() {
    let srv = TestServer::spawn().await;
    let tag = srv.tag("Baking", "baking").await;
    let token = mint_jwt(UserId::new());
    let ghost = IngredientId::new();

    let res = srv
        .client
        .post(srv.url("/recipes"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Ghost soup",
            "text": "Boil.",
            "cooking_time": 5,
            "tags": [tag.id.to_string()],
            "ingredients": [{ "id": ghost.to_string(), "amount": 1 }],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unknown_ingredient");
    assert!(body["message"].as_str().unwrap().contains(&ghost.to_string()));
}

#[tokio::test]
async fn favorites_drive_viewer_flags_and_filters() {
    let srv = TestServer::spawn().await;
    let flour = srv.ingredient("Flour", "g").await;
    let tag = srv.tag("Baking", "baking").await;
    let author = mint_jwt(UserId::new());
    let viewer = mint_jwt(UserId::new());
    let id = srv.create_recipe(&author, "Bread", &tag, &[(&flour, 300)]).await;

    let res = srv
        .client
        .post(srv.url(&format!("/recipes/{id}/favorite")))
        .bearer_auth(&viewer)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["is_favorited"], true);

    let res = srv
        .client
        .get(srv.url("/recipes?is_favorited=1"))
        .bearer_auth(&viewer)
        .send()
        .await
        .unwrap();
    let listed: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(listed.len(), 1);

    // Anonymous viewers have no favorites.
    let res = srv.client.get(srv.url("/recipes?is_favorited=1")).send().await.unwrap();
    let listed: Vec<serde_json::Value> = res.json().await.unwrap();
    assert!(listed.is_empty());

    let res = srv.client.get(srv.url("/recipes?tags=baking")).send().await.unwrap();
    let listed: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["is_favorited"], false);
}

#[tokio::test]
async fn subscription_lifecycle() {
    let srv = TestServer::spawn().await;
    let flour = srv.ingredient("Flour", "g").await;
    let tag = srv.tag("Baking", "baking").await;

    let author_id = srv.profile("baker").await;
    let reader_id = srv.profile("reader").await;
    let author = mint_jwt(author_id);
    let reader = mint_jwt(reader_id);
    srv.create_recipe(&author, "Bread", &tag, &[(&flour, 300)]).await;
    srv.create_recipe(&author, "Rolls", &tag, &[(&flour, 200)]).await;

    let subscribe_url = srv.url(&format!("/users/{author_id}/subscribe"));

    let res = srv
        .client
        .post(srv.url(&format!("/users/{reader_id}/subscribe")))
        .bearer_auth(&reader)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .post(srv.url(&format!("/users/{}/subscribe", UserId::new())))
        .bearer_auth(&reader)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = srv.client.post(&subscribe_url).bearer_auth(&reader).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["username"], "baker");
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 2);

    let res = srv.client.post(&subscribe_url).bearer_auth(&reader).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .get(srv.url("/users/subscriptions?recipes_limit=1"))
        .bearer_auth(&reader)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["recipes"].as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["recipes_count"], 2);

    let res = srv.client.delete(&subscribe_url).bearer_auth(&reader).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv.client.delete(&subscribe_url).bearer_auth(&reader).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ingredient_search_is_a_case_insensitive_prefix() {
    let srv = TestServer::spawn().await;
    srv.ingredient("Flour", "g").await;
    srv.ingredient("flaxseed", "g").await;
    srv.ingredient("Sugar", "g").await;

    let res = srv.client.get(srv.url("/ingredients?name=FL")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Vec<serde_json::Value> = res.json().await.unwrap();
    let names: Vec<&str> = listed.iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Flour", "flaxseed"]);

    let res = srv
        .client
        .get(srv.url(&format!("/ingredients/{}", IngredientId::new())))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies_and_queries_get_the_json_error_shape() {
    let srv = TestServer::spawn().await;
    let flour = srv.ingredient("Flour", "g").await;
    let tag = srv.tag("Baking", "baking").await;
    let token = mint_jwt(srv.profile("baker").await);

    let res = srv
        .client
        .post(srv.url("/recipes"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Bread",
            "text": "Knead.",
            "cooking_time": 30,
            "tags": [tag.id.to_string()],
            "ingredients": [{ "id": flour.id.to_string(), "amount": -1 }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_request");
    assert!(body["message"].is_string());

    let res = srv
        .client
        .get(srv.url("/users/subscriptions?recipes_limit=abc"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_query");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn user_profiles_report_subscription_state() {
    let srv = TestServer::spawn().await;
    let author_id = srv.profile("baker").await;
    let reader_id = srv.profile("reader").await;
    let reader = mint_jwt(reader_id);
    let author_url = srv.url(&format!("/users/{author_id}"));

    let res = srv.client.get(&author_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], author_id.to_string());
    assert_eq!(body["username"], "baker");
    assert_eq!(body["email"], "baker@example.com");
    assert_eq!(body["is_subscribed"], false);

    let res = srv
        .client
        .post(srv.url(&format!("/users/{author_id}/subscribe")))
        .bearer_auth(&reader)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = srv.client.get(&author_url).bearer_auth(&reader).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["is_subscribed"], true);

    let res = srv.client.get(&author_url).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["is_subscribed"], false);

    let res = srv
        .client
        .get(srv.url(&format!("/users/{}", UserId::new())))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_me_returns_the_callers_profile() {
    let srv = TestServer::spawn().await;
    let reader_id = srv.profile("reader").await;

    let res = srv.client.get(srv.url("/users/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .get(srv.url("/users/me"))
        .bearer_auth(mint_jwt(reader_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], reader_id.to_string());
    assert_eq!(body["username"], "reader");
    assert_eq!(body["is_subscribed"], false);
}

#[tokio::test]
async fn trailing_slashes_reach_the_same_routes() {
    let srv = TestServer::spawn().await;
    let flour = srv.ingredient("Flour", "g").await;
    let tag = srv.tag("Baking", "baking").await;
    let token = mint_jwt(srv.profile("baker").await);
    let recipe_id = srv.create_recipe(&token, "Bread", &tag, &[(&flour, 300)]).await;

    let res = srv.client.get(srv.url("/recipes/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(listed.len(), 1);

    let res = srv
        .client
        .post(srv.url(&format!("/recipes/{recipe_id}/shopping_cart/")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = srv
        .client
        .get(srv.url("/recipes/download_shopping_cart/"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Flour"));
}
