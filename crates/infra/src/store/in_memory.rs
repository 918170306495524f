use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use foodgram_core::{IngredientId, RecipeId, TagId, UserId};
use foodgram_recipes::{
    CartEntry, FavoriteEntry, Ingredient, IngredientLine, Recipe, Subscription, Tag, UserProfile,
    ingredient::sort_catalog,
};

use super::r#trait::{
    CartStore, FavoriteStore, IngredientStore, RecipeStore, StoreError, SubscriptionStore, TagStore,
    UserStore,
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, UserProfile>,
    ingredients: HashMap<IngredientId, Ingredient>,
    tags: HashMap<TagId, Tag>,
    recipes: HashMap<RecipeId, Recipe>,
    cart: HashSet<CartEntry>,
    favorites: HashSet<FavoriteEntry>,
    subscriptions: HashSet<Subscription>,
}

impl State {
    /// Referential checks a relational schema would do with foreign keys.
    fn check_references(&self, recipe: &Recipe) -> Result<(), StoreError> {
        for line in &recipe.ingredients {
            if !self.ingredients.contains_key(&line.ingredient_id) {
                return Err(StoreError::not_found(format!(
                    "ingredient {}",
                    line.ingredient_id
                )));
            }
        }
        for tag in &recipe.tags {
            if !self.tags.contains_key(tag) {
                return Err(StoreError::not_found(format!("tag {tag}")));
            }
        }
        Ok(())
    }
}

/// In-memory store for tests/dev.
///
/// One lock guards all tables, so every call sees (and leaves) a consistent
/// state, and deletes cascade atomically.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::unavailable("lock poisoned"))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, profile: UserProfile) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.users.contains_key(&profile.id) {
            return Err(StoreError::duplicate(format!("user {}", profile.id)));
        }
        if state
            .users
            .values()
            .any(|u| u.username == profile.username || u.email == profile.email)
        {
            return Err(StoreError::duplicate("username or email already taken"));
        }
        state.users.insert(profile.id, profile);
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }
}

#[async_trait]
impl IngredientStore for InMemoryStore {
    async fn insert_ingredient(&self, ingredient: Ingredient) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let key = ingredient.measure_key();
        if state.ingredients.values().any(|i| i.measure_key() == key) {
            return Err(StoreError::duplicate(format!(
                "ingredient {}, {}",
                ingredient.name, ingredient.measurement_unit
            )));
        }
        state.ingredients.insert(ingredient.id, ingredient);
        Ok(())
    }

    async fn get_ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, StoreError> {
        Ok(self.read()?.ingredients.get(&id).cloned())
    }

    async fn list_ingredients(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, StoreError> {
        let state = self.read()?;
        let mut items: Vec<Ingredient> = state
            .ingredients
            .values()
            .filter(|i| name_prefix.is_none_or(|p| i.matches_name_prefix(p)))
            .cloned()
            .collect();
        sort_catalog(&mut items);
        Ok(items)
    }
}

#[async_trait]
impl TagStore for InMemoryStore {
    async fn insert_tag(&self, tag: Tag) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.tags.contains_key(&tag.id) {
            return Err(StoreError::duplicate(format!("tag {}", tag.id)));
        }
        state.tags.insert(tag.id, tag);
        Ok(())
    }

    async fn get_tag(&self, id: TagId) -> Result<Option<Tag>, StoreError> {
        Ok(self.read()?.tags.get(&id).cloned())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        let mut tags: Vec<Tag> = self.read()?.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn insert_recipe(&self, recipe: Recipe) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.recipes.contains_key(&recipe.id) {
            return Err(StoreError::duplicate(format!("recipe {}", recipe.id)));
        }
        state.check_references(&recipe)?;
        state.recipes.insert(recipe.id, recipe);
        Ok(())
    }

    async fn update_recipe(&self, recipe: Recipe) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if !state.recipes.contains_key(&recipe.id) {
            return Err(StoreError::not_found(format!("recipe {}", recipe.id)));
        }
        state.check_references(&recipe)?;
        state.recipes.insert(recipe.id, recipe);
        Ok(())
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.recipes.remove(&id).is_none() {
            return Err(StoreError::not_found(format!("recipe {id}")));
        }
        state.cart.retain(|e| e.recipe != id);
        state.favorites.retain(|e| e.recipe != id);
        Ok(())
    }

    async fn get_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError> {
        Ok(self.read()?.recipes.get(&id).cloned())
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let mut recipes: Vec<Recipe> = self.read()?.recipes.values().cloned().collect();
        recipes.sort_by_key(|r| (r.published_at, r.id));
        Ok(recipes)
    }

    async fn recipes_by_author(&self, author: UserId) -> Result<Vec<Recipe>, StoreError> {
        let mut recipes: Vec<Recipe> = self
            .read()?
            .recipes
            .values()
            .filter(|r| r.author == author)
            .cloned()
            .collect();
        recipes.sort_by_key(|r| (r.published_at, r.id));
        Ok(recipes)
    }

    async fn ingredient_lines_for(&self, recipes: &[RecipeId]) -> Result<Vec<IngredientLine>, StoreError> {
        let state = self.read()?;
        let wanted: BTreeSet<RecipeId> = recipes.iter().copied().collect();

        let mut lines = Vec::new();
        for recipe in wanted.iter().filter_map(|id| state.recipes.get(id)) {
            for item in &recipe.ingredients {
                match state.ingredients.get(&item.ingredient_id) {
                    Some(ingredient) => lines.push(IngredientLine::new(
                        ingredient.name.clone(),
                        ingredient.measurement_unit.clone(),
                        item.amount,
                    )),
                    None => tracing::warn!(
                        recipe_id = %recipe.id,
                        ingredient_id = %item.ingredient_id,
                        "recipe references unknown ingredient; line skipped"
                    ),
                }
            }
        }
        Ok(lines)
    }
}

#[async_trait]
impl CartStore for InMemoryStore {
    async fn add_to_cart(&self, entry: CartEntry) -> Result<(), StoreError> {
        if !self.write()?.cart.insert(entry) {
            return Err(StoreError::duplicate("recipe is already in the shopping cart"));
        }
        Ok(())
    }

    async fn remove_from_cart(&self, entry: CartEntry) -> Result<(), StoreError> {
        if !self.write()?.cart.remove(&entry) {
            return Err(StoreError::not_found("recipe is not in the shopping cart"));
        }
        Ok(())
    }

    async fn is_in_cart(&self, entry: CartEntry) -> Result<bool, StoreError> {
        Ok(self.read()?.cart.contains(&entry))
    }

    async fn cart_entries_for(&self, user: UserId) -> Result<Vec<RecipeId>, StoreError> {
        let mut ids: Vec<RecipeId> = self
            .read()?
            .cart
            .iter()
            .filter(|e| e.user == user)
            .map(|e| e.recipe)
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl FavoriteStore for InMemoryStore {
    async fn add_favorite(&self, entry: FavoriteEntry) -> Result<(), StoreError> {
        if !self.write()?.favorites.insert(entry) {
            return Err(StoreError::duplicate("recipe is already in favorites"));
        }
        Ok(())
    }

    async fn remove_favorite(&self, entry: FavoriteEntry) -> Result<(), StoreError> {
        if !self.write()?.favorites.remove(&entry) {
            return Err(StoreError::not_found("recipe is not in favorites"));
        }
        Ok(())
    }

    async fn is_favorite(&self, entry: FavoriteEntry) -> Result<bool, StoreError> {
        Ok(self.read()?.favorites.contains(&entry))
    }

    async fn favorites_for(&self, user: UserId) -> Result<Vec<RecipeId>, StoreError> {
        let mut ids: Vec<RecipeId> = self
            .read()?
            .favorites
            .iter()
            .filter(|e| e.user == user)
            .map(|e| e.recipe)
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryStore {
    async fn subscribe(&self, subscription: Subscription) -> Result<(), StoreError> {
        if !self.write()?.subscriptions.insert(subscription) {
            return Err(StoreError::duplicate("already subscribed to this author"));
        }
        Ok(())
    }

    async fn unsubscribe(&self, subscription: Subscription) -> Result<(), StoreError> {
        if !self.write()?.subscriptions.remove(&subscription) {
            return Err(StoreError::not_found("not subscribed to this author"));
        }
        Ok(())
    }

    async fn is_subscribed(&self, subscription: Subscription) -> Result<bool, StoreError> {
        Ok(self.read()?.subscriptions.contains(&subscription))
    }

    async fn subscriptions_for(&self, user: UserId) -> Result<Vec<UserId>, StoreError> {
        let mut authors: Vec<UserId> = self
            .read()?
            .subscriptions
            .iter()
            .filter(|s| s.user == user)
            .map(|s| s.author)
            .collect();
        authors.sort();
        Ok(authors)
    }
}
