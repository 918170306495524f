//! Repository interfaces and their implementations.
//!
//! Handlers and services depend on the traits in [`r#trait`] only; the
//! in-memory store backs tests and local runs, the Postgres store backs
//! deployments.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use r#trait::{
    CartStore, FavoriteStore, IngredientStore, RecipeStore, Store, StoreError, SubscriptionStore,
    TagStore, UserStore,
};
