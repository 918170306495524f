//! Postgres-backed store.
//!
//! Uniqueness and cascades are enforced by the schema
//! (`migrations/0001_foodgram.sql`), so concurrent duplicate adds race safely:
//! the loser gets a unique violation, mapped to `DuplicateEntry`.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Code | StoreError |
//! |------------|-----------------|------------|
//! | Database (unique violation) | `23505` | `DuplicateEntry` |
//! | Database (foreign key violation) | `23503` | `NotFound` |
//! | Database (other) | any other | `Unavailable` |
//! | PoolClosed, Io, Tls, other | N/A | `Unavailable` |

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use foodgram_core::{IngredientId, RecipeId, TagId, UserId};
use foodgram_recipes::{
    CartEntry, FavoriteEntry, HexColor, Ingredient, IngredientAmount, IngredientLine, Recipe,
    Subscription, Tag, UserProfile,
};

use super::r#trait::{
    CartStore, FavoriteStore, IngredientStore, RecipeStore, StoreError, SubscriptionStore, TagStore,
    UserStore,
};

const SCHEMA: &str = include_str!("../../migrations/0001_foodgram.sql");

/// Postgres-backed implementation of every store trait.
///
/// Thread-safe: all access goes through the SQLx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and build a store on the resulting pool.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }

    /// Load ingredient and tag references for a batch of recipe rows.
    async fn hydrate_recipes(&self, rows: Vec<PgRow>) -> Result<Vec<Recipe>, StoreError> {
        let mut recipes = rows
            .iter()
            .map(recipe_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        if recipes.is_empty() {
            return Ok(recipes);
        }

        let ids: Vec<Uuid> = recipes.iter().map(|r| *r.id.as_uuid()).collect();

        let line_rows = sqlx::query(
            r#"
            SELECT recipe_id, ingredient_id, amount
            FROM recipe_ingredients
            WHERE recipe_id = ANY($1)
            ORDER BY recipe_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_recipe_ingredients", e))?;

        let tag_rows = sqlx::query(
            r#"
            SELECT recipe_id, tag_id
            FROM recipe_tags
            WHERE recipe_id = ANY($1)
            ORDER BY recipe_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_recipe_tags", e))?;

        let mut lines: HashMap<Uuid, Vec<IngredientAmount>> = HashMap::new();
        for row in &line_rows {
            let recipe_id: Uuid = get(row, "recipe_id")?;
            lines.entry(recipe_id).or_default().push(IngredientAmount {
                ingredient_id: IngredientId::from_uuid(get(row, "ingredient_id")?),
                amount: to_u32("amount", get(row, "amount")?)?,
            });
        }

        let mut tags: HashMap<Uuid, Vec<TagId>> = HashMap::new();
        for row in &tag_rows {
            let recipe_id: Uuid = get(row, "recipe_id")?;
            tags.entry(recipe_id)
                .or_default()
                .push(TagId::from_uuid(get(row, "tag_id")?));
        }

        for recipe in &mut recipes {
            let key = *recipe.id.as_uuid();
            recipe.ingredients = lines.remove(&key).unwrap_or_default();
            recipe.tags = tags.remove(&key).unwrap_or_default();
        }
        Ok(recipes)
    }
}

/// Write a recipe's ingredient lines and tags (rows must not exist yet).
async fn insert_recipe_children(
    tx: &mut Transaction<'_, Postgres>,
    recipe: &Recipe,
) -> Result<(), StoreError> {
    for (position, line) in recipe.ingredients.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount, position)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(recipe.id.as_uuid())
        .bind(line.ingredient_id.as_uuid())
        .bind(i64::from(line.amount))
        .bind(position as i32)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_recipe_ingredient", e))?;
    }

    for (position, tag) in recipe.tags.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO recipe_tags (recipe_id, tag_id, position)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(recipe.id.as_uuid())
        .bind(tag.as_uuid())
        .bind(position as i32)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_recipe_tag", e))?;
    }

    Ok(())
}

#[async_trait]
impl UserStore for PostgresStore {
    #[instrument(skip(self, profile), fields(user_id = %profile.id), err)]
    async fn insert_user(&self, profile: UserProfile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(&profile.email)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, username, first_name, last_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_user", e))?;

        row.as_ref().map(user_from_row).transpose()
    }
}

#[async_trait]
impl IngredientStore for PostgresStore {
    #[instrument(skip(self, ingredient), fields(ingredient_id = %ingredient.id), err)]
    async fn insert_ingredient(&self, ingredient: Ingredient) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO ingredients (id, name, measurement_unit)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(ingredient.id.as_uuid())
        .bind(&ingredient.name)
        .bind(&ingredient.measurement_unit)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_ingredient", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get_ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, StoreError> {
        let row = sqlx::query("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_ingredient", e))?;

        row.as_ref().map(ingredient_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_ingredients(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, StoreError> {
        let pattern = name_prefix.map(|p| format!("{}%", escape_like(&p.to_lowercase())));

        let rows = sqlx::query(
            r#"
            SELECT id, name, measurement_unit
            FROM ingredients
            WHERE ($1::text IS NULL OR lower(name) LIKE $1)
            ORDER BY name COLLATE "C", measurement_unit COLLATE "C"
            "#,
        )
        .bind(pattern)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_ingredients", e))?;

        rows.iter().map(ingredient_from_row).collect()
    }
}

#[async_trait]
impl TagStore for PostgresStore {
    #[instrument(skip(self, tag), fields(tag_id = %tag.id), err)]
    async fn insert_tag(&self, tag: Tag) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO tags (id, name, color, slug) VALUES ($1, $2, $3, $4)")
            .bind(tag.id.as_uuid())
            .bind(&tag.name)
            .bind(tag.color.as_ref().map(|c| c.as_str()))
            .bind(tag.slug.as_deref())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_tag", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get_tag(&self, id: TagId) -> Result<Option<Tag>, StoreError> {
        let row = sqlx::query("SELECT id, name, color, slug FROM tags WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_tag", e))?;

        row.as_ref().map(tag_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        let rows = sqlx::query(r#"SELECT id, name, color, slug FROM tags ORDER BY name COLLATE "C""#)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_tags", e))?;

        rows.iter().map(tag_from_row).collect()
    }
}

#[async_trait]
impl RecipeStore for PostgresStore {
    #[instrument(skip(self, recipe), fields(recipe_id = %recipe.id), err)]
    async fn insert_recipe(&self, recipe: Recipe) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        sqlx::query(
            r#"
            INSERT INTO recipes (id, author_id, name, text, cooking_time, image, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(recipe.id.as_uuid())
        .bind(recipe.author.as_uuid())
        .bind(&recipe.name)
        .bind(&recipe.text)
        .bind(i64::from(recipe.cooking_time))
        .bind(recipe.image.as_deref())
        .bind(recipe.published_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_recipe", e))?;

        insert_recipe_children(&mut tx, &recipe).await?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(())
    }

    #[instrument(skip(self, recipe), fields(recipe_id = %recipe.id), err)]
    async fn update_recipe(&self, recipe: Recipe) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        let updated = sqlx::query(
            r#"
            UPDATE recipes
            SET name = $2, text = $3, cooking_time = $4, image = $5
            WHERE id = $1
            "#,
        )
        .bind(recipe.id.as_uuid())
        .bind(&recipe.name)
        .bind(&recipe.text)
        .bind(i64::from(recipe.cooking_time))
        .bind(recipe.image.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_recipe", e))?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::not_found(format!("recipe {}", recipe.id)));
        }

        for table in ["recipe_ingredients", "recipe_tags"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE recipe_id = $1"))
                .bind(recipe.id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("clear_recipe_children", e))?;
        }

        insert_recipe_children(&mut tx, &recipe).await?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn delete_recipe(&self, id: RecipeId) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_recipe", e))?;

        if deleted.rows_affected() == 0 {
            return Err(StoreError::not_found(format!("recipe {id}")));
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, author_id, name, text, cooking_time, image, published_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_recipe", e))?;

        Ok(self.hydrate_recipes(rows).await?.into_iter().next())
    }

    #[instrument(skip(self), err)]
    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, author_id, name, text, cooking_time, image, published_at
            FROM recipes
            ORDER BY published_at, id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_recipes", e))?;

        self.hydrate_recipes(rows).await
    }

    #[instrument(skip(self), err)]
    async fn recipes_by_author(&self, author: UserId) -> Result<Vec<Recipe>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, author_id, name, text, cooking_time, image, published_at
            FROM recipes
            WHERE author_id = $1
            ORDER BY published_at, id
            "#,
        )
        .bind(author.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("recipes_by_author", e))?;

        self.hydrate_recipes(rows).await
    }

    #[instrument(skip(self, recipes), fields(recipe_count = recipes.len()), err)]
    async fn ingredient_lines_for(&self, recipes: &[RecipeId]) -> Result<Vec<IngredientLine>, StoreError> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = recipes.iter().map(|r| *r.as_uuid()).collect();

        // `ANY` matches each recipe row once, however often its id repeats.
        let rows = sqlx::query(
            r#"
            SELECT i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ingredient_lines_for", e))?;

        rows.iter()
            .map(|row| {
                Ok(IngredientLine::new(
                    get::<String>(row, "name")?,
                    get::<String>(row, "measurement_unit")?,
                    to_u32("amount", get(row, "amount")?)?,
                ))
            })
            .collect()
    }
}

#[async_trait]
impl CartStore for PostgresStore {
    #[instrument(skip(self), err)]
    async fn add_to_cart(&self, entry: CartEntry) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO shopping_cart (user_id, recipe_id) VALUES ($1, $2)")
            .bind(entry.user.as_uuid())
            .bind(entry.recipe.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| match map_sqlx_error("add_to_cart", e) {
                StoreError::DuplicateEntry(_) => {
                    StoreError::duplicate("recipe is already in the shopping cart")
                }
                other => other,
            })?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn remove_from_cart(&self, entry: CartEntry) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM shopping_cart WHERE user_id = $1 AND recipe_id = $2")
            .bind(entry.user.as_uuid())
            .bind(entry.recipe.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove_from_cart", e))?;

        if deleted.rows_affected() == 0 {
            return Err(StoreError::not_found("recipe is not in the shopping cart"));
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn is_in_cart(&self, entry: CartEntry) -> Result<bool, StoreError> {
        pair_exists(&self.pool, "shopping_cart", "recipe_id", entry.user, *entry.recipe.as_uuid()).await
    }

    #[instrument(skip(self), err)]
    async fn cart_entries_for(&self, user: UserId) -> Result<Vec<RecipeId>, StoreError> {
        let rows = sqlx::query("SELECT recipe_id FROM shopping_cart WHERE user_id = $1 ORDER BY recipe_id")
            .bind(user.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("cart_entries_for", e))?;

        rows.iter()
            .map(|row| get(row, "recipe_id").map(RecipeId::from_uuid))
            .collect()
    }
}

#[async_trait]
impl FavoriteStore for PostgresStore {
    #[instrument(skip(self), err)]
    async fn add_favorite(&self, entry: FavoriteEntry) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO favorites (user_id, recipe_id) VALUES ($1, $2)")
            .bind(entry.user.as_uuid())
            .bind(entry.recipe.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| match map_sqlx_error("add_favorite", e) {
                StoreError::DuplicateEntry(_) => StoreError::duplicate("recipe is already in favorites"),
                other => other,
            })?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn remove_favorite(&self, entry: FavoriteEntry) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND recipe_id = $2")
            .bind(entry.user.as_uuid())
            .bind(entry.recipe.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove_favorite", e))?;

        if deleted.rows_affected() == 0 {
            return Err(StoreError::not_found("recipe is not in favorites"));
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn is_favorite(&self, entry: FavoriteEntry) -> Result<bool, StoreError> {
        pair_exists(&self.pool, "favorites", "recipe_id", entry.user, *entry.recipe.as_uuid()).await
    }

    #[instrument(skip(self), err)]
    async fn favorites_for(&self, user: UserId) -> Result<Vec<RecipeId>, StoreError> {
        let rows = sqlx::query("SELECT recipe_id FROM favorites WHERE user_id = $1 ORDER BY recipe_id")
            .bind(user.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("favorites_for", e))?;

        rows.iter()
            .map(|row| get(row, "recipe_id").map(RecipeId::from_uuid))
            .collect()
    }
}

#[async_trait]
impl SubscriptionStore for PostgresStore {
    #[instrument(skip(self), err)]
    async fn subscribe(&self, subscription: Subscription) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO subscriptions (user_id, author_id) VALUES ($1, $2)")
            .bind(subscription.user.as_uuid())
            .bind(subscription.author.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| match map_sqlx_error("subscribe", e) {
                StoreError::DuplicateEntry(_) => StoreError::duplicate("already subscribed to this author"),
                other => other,
            })?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn unsubscribe(&self, subscription: Subscription) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(subscription.user.as_uuid())
            .bind(subscription.author.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("unsubscribe", e))?;

        if deleted.rows_affected() == 0 {
            return Err(StoreError::not_found("not subscribed to this author"));
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn is_subscribed(&self, subscription: Subscription) -> Result<bool, StoreError> {
        pair_exists(
            &self.pool,
            "subscriptions",
            "author_id",
            subscription.user,
            *subscription.author.as_uuid(),
        )
        .await
    }

    #[instrument(skip(self), err)]
    async fn subscriptions_for(&self, user: UserId) -> Result<Vec<UserId>, StoreError> {
        let rows = sqlx::query("SELECT author_id FROM subscriptions WHERE user_id = $1 ORDER BY author_id")
            .bind(user.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("subscriptions_for", e))?;

        rows.iter()
            .map(|row| get(row, "author_id").map(UserId::from_uuid))
            .collect()
    }
}

/// `SELECT EXISTS` over one of the `(user_id, <other>)` pair tables.
///
/// `table` and `column` are compile-time constants from this module.
async fn pair_exists(
    pool: &PgPool,
    table: &'static str,
    column: &'static str,
    user: UserId,
    other: Uuid,
) -> Result<bool, StoreError> {
    let row = sqlx::query(&format!(
        "SELECT EXISTS (SELECT 1 FROM {table} WHERE user_id = $1 AND {column} = $2) AS present"
    ))
    .bind(user.as_uuid())
    .bind(other)
    .fetch_one(pool)
    .await
    .map_err(|e| map_sqlx_error("pair_exists", e))?;

    get(&row, "present")
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get::<T, _>(column)
        .map_err(|e| StoreError::unavailable(format!("failed to read column {column}: {e}")))
}

fn to_u32(column: &str, value: i64) -> Result<u32, StoreError> {
    u32::try_from(value)
        .map_err(|_| StoreError::unavailable(format!("column {column} out of range: {value}")))
}

fn user_from_row(row: &PgRow) -> Result<UserProfile, StoreError> {
    Ok(UserProfile {
        id: UserId::from_uuid(get(row, "id")?),
        email: get(row, "email")?,
        username: get(row, "username")?,
        first_name: get(row, "first_name")?,
        last_name: get(row, "last_name")?,
    })
}

fn ingredient_from_row(row: &PgRow) -> Result<Ingredient, StoreError> {
    Ok(Ingredient {
        id: IngredientId::from_uuid(get(row, "id")?),
        name: get(row, "name")?,
        measurement_unit: get(row, "measurement_unit")?,
    })
}

fn tag_from_row(row: &PgRow) -> Result<Tag, StoreError> {
    let color = get::<Option<String>>(row, "color")?
        .map(|c| c.parse::<HexColor>())
        .transpose()
        .map_err(|e| StoreError::unavailable(format!("stored tag color is invalid: {e}")))?;

    Ok(Tag {
        id: TagId::from_uuid(get(row, "id")?),
        name: get(row, "name")?,
        color,
        slug: get(row, "slug")?,
    })
}

/// Recipe columns only; lines and tags are filled in by `hydrate_recipes`.
fn recipe_from_row(row: &PgRow) -> Result<Recipe, StoreError> {
    Ok(Recipe {
        id: RecipeId::from_uuid(get(row, "id")?),
        author: UserId::from_uuid(get(row, "author_id")?),
        name: get(row, "name")?,
        text: get(row, "text")?,
        cooking_time: to_u32("cooking_time", get(row, "cooking_time")?)?,
        image: get(row, "image")?,
        tags: Vec::new(),
        ingredients: Vec::new(),
        published_at: get::<DateTime<Utc>>(row, "published_at")?,
    })
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::DuplicateEntry(msg),
                Some("23503") => StoreError::NotFound(msg),
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::unavailable(format!("connection pool closed in {operation}"))
        }
        _ => StoreError::unavailable(format!("sqlx error in {operation}: {err}")),
    }
}
