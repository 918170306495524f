//! Service wiring: the store behind the API and the read-side assembly that
//! turns stored rows into viewer-relative representations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use foodgram_core::{IngredientId, RecipeId, TagId, UserId};
use foodgram_infra::build_shopping_list;
use foodgram_infra::store::{InMemoryStore, PostgresStore, Store, StoreError};
use foodgram_recipes::{
    AggregatedLine, Ingredient, Recipe, RecipeFilter, Subscription, Tag, UserProfile, ViewerFlags,
};

/// Shared services handed to every handler.
pub struct AppServices {
    store: Arc<dyn Store>,
}

impl AppServices {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// Connect to Postgres and apply the schema before serving.
    pub async fn postgres(database_url: &str) -> Result<Self, StoreError> {
        let store = PostgresStore::connect(database_url).await?;
        store.migrate().await?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn store(&self) -> &dyn Store {
        &*self.store
    }

    pub async fn shopping_list(&self, user: UserId) -> Result<Vec<AggregatedLine>, StoreError> {
        build_shopping_list(self.store(), self.store(), user).await
    }

    /// The viewer's favorites, cart and subscriptions (empty when anonymous).
    pub async fn viewer_state(&self, viewer: Option<UserId>) -> Result<ViewerState, StoreError> {
        let Some(user) = viewer else {
            return Ok(ViewerState::default());
        };
        let store = self.store();

        Ok(ViewerState {
            favorites: store.favorites_for(user).await?.into_iter().collect(),
            cart: store.cart_entries_for(user).await?.into_iter().collect(),
            subscriptions: store.subscriptions_for(user).await?.into_iter().collect(),
        })
    }

    /// Whether `viewer` follows `author`; always `false` for anonymous viewers.
    pub async fn is_subscribed(&self, viewer: Option<UserId>, author: UserId) -> Result<bool, StoreError> {
        match viewer {
            Some(user) => self.store().is_subscribed(Subscription { user, author }).await,
            None => Ok(false),
        }
    }

    /// The whole tag and ingredient catalog.
    pub async fn catalog(&self) -> Result<Catalog, StoreError> {
        let store = self.store();
        Ok(Catalog {
            tags: store.list_tags().await?.into_iter().map(|t| (t.id, t)).collect(),
            ingredients: store
                .list_ingredients(None)
                .await?
                .into_iter()
                .map(|i| (i.id, i))
                .collect(),
        })
    }

    /// Only the catalog entries `recipe` references.
    pub async fn catalog_for(&self, recipe: &Recipe) -> Result<Catalog, StoreError> {
        let store = self.store();
        let mut catalog = Catalog::default();

        for id in &recipe.tags {
            if let Some(tag) = store.get_tag(*id).await? {
                catalog.tags.insert(tag.id, tag);
            }
        }
        for line in &recipe.ingredients {
            if let Some(ingredient) = store.get_ingredient(line.ingredient_id).await? {
                catalog.ingredients.insert(ingredient.id, ingredient);
            }
        }
        Ok(catalog)
    }

    pub async fn recipe_details(
        &self,
        view: &ViewerState,
        catalog: &Catalog,
        recipe: Recipe,
    ) -> Result<RecipeDetails, StoreError> {
        let author = self.store().get_user(recipe.author).await?;

        let tags = recipe
            .tags
            .iter()
            .filter_map(|id| catalog.tags.get(id).cloned())
            .collect();

        let ingredients = recipe
            .ingredients
            .iter()
            .filter_map(|line| match catalog.ingredients.get(&line.ingredient_id) {
                Some(ingredient) => Some((ingredient.clone(), line.amount)),
                None => {
                    tracing::warn!(
                        recipe_id = %recipe.id,
                        ingredient_id = %line.ingredient_id,
                        "recipe references an unknown ingredient"
                    );
                    None
                }
            })
            .collect();

        Ok(RecipeDetails {
            author,
            author_subscribed: view.is_subscribed(recipe.author),
            flags: view.flags(recipe.id),
            tags,
            ingredients,
            recipe,
        })
    }

    /// Recipes in publication order that pass `filter` for this viewer.
    pub async fn list_recipes(
        &self,
        view: &ViewerState,
        filter: &RecipeFilter,
    ) -> Result<Vec<RecipeDetails>, StoreError> {
        let catalog = self.catalog().await?;
        let mut out = Vec::new();
        for recipe in self.store().list_recipes().await? {
            let slugs = catalog.tag_slugs(&recipe);
            if filter.matches(&recipe, &slugs, view.flags(recipe.id)) {
                out.push(self.recipe_details(view, &catalog, recipe).await?);
            }
        }
        Ok(out)
    }

    /// An author with their recipes, oldest first, truncated to `recipes_limit`.
    pub async fn author_details(
        &self,
        profile: UserProfile,
        is_subscribed: bool,
        recipes_limit: Option<usize>,
    ) -> Result<AuthorDetails, StoreError> {
        let mut recipes = self.store().recipes_by_author(profile.id).await?;
        let recipes_count = recipes.len();
        if let Some(limit) = recipes_limit {
            recipes.truncate(limit);
        }

        Ok(AuthorDetails {
            is_subscribed,
            profile,
            recipes,
            recipes_count,
        })
    }
}

/// Per-request view of the viewer's relations.
#[derive(Debug, Default)]
pub struct ViewerState {
    favorites: HashSet<RecipeId>,
    cart: HashSet<RecipeId>,
    subscriptions: HashSet<UserId>,
}

impl ViewerState {
    pub fn flags(&self, recipe: RecipeId) -> ViewerFlags {
        ViewerFlags {
            is_favorited: self.favorites.contains(&recipe),
            is_in_shopping_cart: self.cart.contains(&recipe),
        }
    }

    pub fn is_subscribed(&self, author: UserId) -> bool {
        self.subscriptions.contains(&author)
    }
}

/// Tags and ingredients needed to render recipes.
#[derive(Debug, Default)]
pub struct Catalog {
    tags: HashMap<TagId, Tag>,
    ingredients: HashMap<IngredientId, Ingredient>,
}

impl Catalog {
    fn tag_slugs(&self, recipe: &Recipe) -> Vec<&str> {
        recipe
            .tags
            .iter()
            .filter_map(|id| self.tags.get(id))
            .filter_map(|t| t.slug.as_deref())
            .collect()
    }
}

/// A recipe with its references resolved.
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    /// `None` when the author has no profile in the user directory.
    pub author: Option<UserProfile>,
    pub author_subscribed: bool,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<(Ingredient, u32)>,
    pub flags: ViewerFlags,
}

#[derive(Debug, Clone)]
pub struct AuthorDetails {
    pub profile: UserProfile,
    pub is_subscribed: bool,
    pub recipes: Vec<Recipe>,
    pub recipes_count: usize,
}
