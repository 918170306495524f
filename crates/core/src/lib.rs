//! `foodgram-core`: shared domain building blocks.
//!
//! Identifiers, the domain error model and the small marker traits used by the
//! recipe domain. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{IngredientId, RecipeId, TagId, UserId};
pub use value_object::ValueObject;
