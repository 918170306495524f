use async_trait::async_trait;
use thiserror::Error;

use foodgram_core::{IngredientId, RecipeId, TagId, UserId};
use foodgram_recipes::{
    CartEntry, FavoriteEntry, Ingredient, IngredientLine, Recipe, Subscription, Tag, UserProfile,
};

/// Store operation error.
///
/// Infrastructure-level outcomes: a uniqueness constraint tripped, a row is
/// missing, or the backing storage could not be reached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The entry already exists (unique pair, unique catalog key).
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),

    /// The addressed row (or a row it references) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage failure (connectivity, poisoned lock, decode error).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::DuplicateEntry(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Read access to author profiles (plus provisioning for seeding/tests).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, profile: UserProfile) -> Result<(), StoreError>;
    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, StoreError>;
}

/// Ingredient catalog, unique per `(name, measurement_unit)`.
#[async_trait]
pub trait IngredientStore: Send + Sync {
    async fn insert_ingredient(&self, ingredient: Ingredient) -> Result<(), StoreError>;
    async fn get_ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, StoreError>;

    /// All ingredients, or those whose name starts with `name_prefix`
    /// (case-insensitive). Sorted by name, then unit.
    async fn list_ingredients(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, StoreError>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    async fn insert_tag(&self, tag: Tag) -> Result<(), StoreError>;
    async fn get_tag(&self, id: TagId) -> Result<Option<Tag>, StoreError>;

    /// All tags, sorted by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError>;
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Fails with `NotFound` if a referenced ingredient or tag is unknown.
    async fn insert_recipe(&self, recipe: Recipe) -> Result<(), StoreError>;

    /// Replaces the stored recipe (including its full ingredient line set).
    async fn update_recipe(&self, recipe: Recipe) -> Result<(), StoreError>;

    /// Deletes the recipe and cascades to its cart and favorite entries.
    async fn delete_recipe(&self, id: RecipeId) -> Result<(), StoreError>;

    async fn get_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError>;

    /// All recipes in publication order.
    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError>;

    /// Recipes by one author, in publication order.
    async fn recipes_by_author(&self, author: UserId) -> Result<Vec<Recipe>, StoreError>;

    /// Ingredient lines of all the given recipes, in one call.
    ///
    /// Unknown recipe ids contribute no lines. Each recipe is expanded once,
    /// however often its id appears in `recipes`. Line order is unspecified.
    async fn ingredient_lines_for(&self, recipes: &[RecipeId]) -> Result<Vec<IngredientLine>, StoreError>;
}

/// Per-user shopping cart: a set of `(user, recipe)` pairs.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// `DuplicateEntry` if the pair is already present.
    async fn add_to_cart(&self, entry: CartEntry) -> Result<(), StoreError>;

    /// `NotFound` if the pair is absent.
    async fn remove_from_cart(&self, entry: CartEntry) -> Result<(), StoreError>;

    async fn is_in_cart(&self, entry: CartEntry) -> Result<bool, StoreError>;

    /// Recipe ids in the user's cart (no duplicates).
    async fn cart_entries_for(&self, user: UserId) -> Result<Vec<RecipeId>, StoreError>;
}

/// Per-user favorites: a set of `(user, recipe)` pairs.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn add_favorite(&self, entry: FavoriteEntry) -> Result<(), StoreError>;
    async fn remove_favorite(&self, entry: FavoriteEntry) -> Result<(), StoreError>;
    async fn is_favorite(&self, entry: FavoriteEntry) -> Result<bool, StoreError>;
    async fn favorites_for(&self, user: UserId) -> Result<Vec<RecipeId>, StoreError>;
}

/// Follow relations between users.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn subscribe(&self, subscription: Subscription) -> Result<(), StoreError>;
    async fn unsubscribe(&self, subscription: Subscription) -> Result<(), StoreError>;
    async fn is_subscribed(&self, subscription: Subscription) -> Result<bool, StoreError>;

    /// Authors `user` follows.
    async fn subscriptions_for(&self, user: UserId) -> Result<Vec<UserId>, StoreError>;
}

/// Everything the API needs, as one object-safe bundle.
pub trait Store:
    UserStore + IngredientStore + TagStore + RecipeStore + CartStore + FavoriteStore + SubscriptionStore
{
}

impl<T> Store for T where
    T: UserStore
        + IngredientStore
        + TagStore
        + RecipeStore
        + CartStore
        + FavoriteStore
        + SubscriptionStore
{
}
