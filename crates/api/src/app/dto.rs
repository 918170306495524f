use axum::http::StatusCode;
use serde::Deserialize;

use foodgram_core::{IngredientId, TagId, UserId};
use foodgram_recipes::{Ingredient, IngredientAmount, Recipe, RecipeDraft, RecipeFilter, Tag, UserProfile};

use crate::app::errors;
use crate::app::services::{AuthorDetails, RecipeDetails};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct IngredientAmountRequest {
    pub id: String,
    pub amount: u32,
}

/// Body of recipe create and update; an update replaces every field.
#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub name: String,
    pub text: String,
    pub cooking_time: u32,
    #[serde(default)]
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<IngredientAmountRequest>,
}

impl RecipeRequest {
    /// Parse ids; content rules are checked by the domain when publishing.
    pub fn into_draft(self) -> Result<RecipeDraft, axum::response::Response> {
        let tags = self
            .tags
            .iter()
            .map(|raw| parse_id::<TagId>(raw, "tag"))
            .collect::<Result<Vec<_>, _>>()?;

        let ingredients = self
            .ingredients
            .iter()
            .map(|line| {
                Ok(IngredientAmount {
                    ingredient_id: parse_id::<IngredientId>(&line.id, "ingredient")?,
                    amount: line.amount,
                })
            })
            .collect::<Result<Vec<_>, axum::response::Response>>()?;

        Ok(RecipeDraft {
            name: self.name,
            text: self.text,
            cooking_time: self.cooking_time,
            image: self.image,
            tags,
            ingredients,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionsQuery {
    pub recipes_limit: Option<usize>,
}

/// Build a recipe filter from raw query pairs (`tags` may repeat).
pub fn parse_recipe_filter(
    pairs: &[(String, String)],
) -> Result<RecipeFilter, axum::response::Response> {
    let mut filter = RecipeFilter::default();
    for (key, value) in pairs {
        match key.as_str() {
            "tags" => filter.tags.push(value.clone()),
            "author" => filter.author = Some(parse_id::<UserId>(value, "author")?),
            "is_favorited" => filter.is_favorited = Some(parse_flag(key, value)?),
            "is_in_shopping_cart" => filter.is_in_shopping_cart = Some(parse_flag(key, value)?),
            _ => {}
        }
    }
    Ok(filter)
}

fn parse_flag(key: &str, value: &str) -> Result<bool, axum::response::Response> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_filter",
            format!("{key} must be one of: 1, 0, true, false"),
        )),
    }
}

pub fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("invalid {what} id: {raw}"),
        )
    })
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn ingredient_to_json(i: &Ingredient) -> serde_json::Value {
    serde_json::json!({
        "id": i.id.to_string(),
        "name": i.name,
        "measurement_unit": i.measurement_unit,
    })
}

pub fn tag_to_json(t: &Tag) -> serde_json::Value {
    serde_json::json!({
        "id": t.id.to_string(),
        "name": t.name,
        "color": t.color.as_ref().map(|c| c.as_str()),
        "slug": t.slug,
    })
}

/// Author block; profile fields are `null` for users the directory lacks.
pub fn user_to_json(id: UserId, profile: Option<&UserProfile>, is_subscribed: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id.to_string(),
        "email": profile.map(|p| p.email.as_str()),
        "username": profile.map(|p| p.username.as_str()),
        "first_name": profile.map(|p| p.first_name.as_str()),
        "last_name": profile.map(|p| p.last_name.as_str()),
        "is_subscribed": is_subscribed,
    })
}

pub fn recipe_short_to_json(r: &Recipe) -> serde_json::Value {
    serde_json::json!({
        "id": r.id.to_string(),
        "name": r.name,
        "image": r.image,
        "cooking_time": r.cooking_time,
    })
}

pub fn recipe_to_json(d: &RecipeDetails) -> serde_json::Value {
    let r = &d.recipe;
    serde_json::json!({
        "id": r.id.to_string(),
        "author": user_to_json(r.author, d.author.as_ref(), d.author_subscribed),
        "name": r.name,
        "text": r.text,
        "cooking_time": r.cooking_time,
        "image": r.image,
        "tags": d.tags.iter().map(tag_to_json).collect::<Vec<_>>(),
        "ingredients": d.ingredients.iter().map(|(i, amount)| serde_json::json!({
            "id": i.id.to_string(),
            "name": i.name,
            "measurement_unit": i.measurement_unit,
            "amount": amount,
        })).collect::<Vec<_>>(),
        "is_favorited": d.flags.is_favorited,
        "is_in_shopping_cart": d.flags.is_in_shopping_cart,
        "published_at": r.published_at.to_rfc3339(),
    })
}

/// Author with their recipes, as returned by the subscription endpoints.
pub fn author_to_json(a: &AuthorDetails) -> serde_json::Value {
    let mut body = user_to_json(a.profile.id, Some(&a.profile), a.is_subscribed);
    body["recipes"] = a.recipes.iter().map(recipe_short_to_json).collect();
    body["recipes_count"] = serde_json::json!(a.recipes_count);
    body
}
