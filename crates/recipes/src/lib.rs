//! Recipes domain module.
//!
//! Business rules for the ingredient and tag catalogs, recipe composition,
//! per-user relations (cart, favorites, subscriptions), listing filters, and
//! the shopping-list aggregation engine. Pure, deterministic logic: no IO, no
//! HTTP, no storage.

pub mod filter;
pub mod ingredient;
pub mod profile;
pub mod recipe;
pub mod relations;
pub mod shopping_list;
pub mod tag;

mod text;

pub use filter::{RecipeFilter, ViewerFlags};
pub use ingredient::Ingredient;
pub use profile::UserProfile;
pub use recipe::{IngredientAmount, Recipe, RecipeDraft};
pub use relations::{CartEntry, FavoriteEntry, Subscription};
pub use shopping_list::{AggregatedLine, IngredientLine, MeasureKey, SHOPPING_LIST_FILENAME, aggregate, render};
pub use tag::{HexColor, Tag};
