//! Shopping-list assembly: cart -> ingredient lines -> aggregated totals.

use tracing::{debug, instrument};

use foodgram_core::UserId;
use foodgram_recipes::{AggregatedLine, aggregate};

use crate::store::{CartStore, RecipeStore, StoreError};

/// Aggregate the ingredients of every recipe in `user`'s cart.
///
/// Recipes are read in one batch; cart entries pointing at recipes that no
/// longer exist contribute nothing. An empty cart yields an empty list.
#[instrument(skip(carts, recipes), fields(user_id = %user), err)]
pub async fn build_shopping_list<C, R>(
    carts: &C,
    recipes: &R,
    user: UserId,
) -> Result<Vec<AggregatedLine>, StoreError>
where
    C: CartStore + ?Sized,
    R: RecipeStore + ?Sized,
{
    let cart = carts.cart_entries_for(user).await?;
    if cart.is_empty() {
        debug!("shopping cart is empty");
        return Ok(Vec::new());
    }

    let lines = recipes.ingredient_lines_for(&cart).await?;
    let aggregated = aggregate(lines);

    debug!(
        recipe_count = cart.len(),
        line_count = aggregated.len(),
        "shopping list aggregated"
    );
    Ok(aggregated)
}
