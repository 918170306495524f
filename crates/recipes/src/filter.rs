//! Recipe listing filters.

use serde::{Deserialize, Serialize};

use foodgram_core::UserId;

use crate::recipe::Recipe;

/// Viewer-relative facts about one recipe.
///
/// Anonymous viewers have neither favorites nor a cart, so both flags are
/// `false` for them.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerFlags {
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Filter for the recipe listing.
///
/// Every criterion that is set must match. `tags` matches when the recipe
/// carries any of the given slugs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFilter {
    pub tags: Vec<String>,
    pub author: Option<UserId>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe, recipe_tag_slugs: &[&str], flags: ViewerFlags) -> bool {
        if let Some(author) = self.author {
            if recipe.author != author {
                return false;
            }
        }

        if !self.tags.is_empty()
            && !self
                .tags
                .iter()
                .any(|wanted| recipe_tag_slugs.contains(&wanted.as_str()))
        {
            return false;
        }

        if let Some(wanted) = self.is_favorited {
            if flags.is_favorited != wanted {
                return false;
            }
        }

        if let Some(wanted) = self.is_in_shopping_cart {
            if flags.is_in_shopping_cart != wanted {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use foodgram_core::{IngredientId, RecipeId, TagId};

    use super::*;
    use crate::recipe::{IngredientAmount, RecipeDraft};

    fn recipe(author: UserId) -> Recipe {
        Recipe::publish(
            RecipeId::new(),
            author,
            RecipeDraft {
                name: "Soup".to_string(),
                text: "Boil.".to_string(),
                cooking_time: 30,
                image: None,
                tags: vec![TagId::new()],
                ingredients: vec![IngredientAmount {
                    ingredient_id: IngredientId::new(),
                    amount: 1,
                }],
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let r = recipe(UserId::new());
        assert!(RecipeFilter::default().matches(&r, &[], ViewerFlags::default()));
    }

    #[test]
    fn author_filter() {
        let author = UserId::new();
        let r = recipe(author);
        let f = RecipeFilter {
            author: Some(author),
            ..Default::default()
        };
        assert!(f.matches(&r, &[], ViewerFlags::default()));

        let f = RecipeFilter {
            author: Some(UserId::new()),
            ..Default::default()
        };
        assert!(!f.matches(&r, &[], ViewerFlags::default()));
    }

    #[test]
    fn tag_filter_matches_any_slug() {
        let r = recipe(UserId::new());
        let f = RecipeFilter {
            tags: vec!["lunch".to_string(), "dinner".to_string()],
            ..Default::default()
        };
        assert!(f.matches(&r, &["dinner"], ViewerFlags::default()));
        assert!(!f.matches(&r, &["breakfast"], ViewerFlags::default()));
        assert!(!f.matches(&r, &[], ViewerFlags::default()));
    }

    #[test]
    fn viewer_flag_filters() {
        let r = recipe(UserId::new());
        let in_cart = ViewerFlags {
            is_favorited: false,
            is_in_shopping_cart: true,
        };

        let want_cart = RecipeFilter {
            is_in_shopping_cart: Some(true),
            ..Default::default()
        };
        assert!(want_cart.matches(&r, &[], in_cart));
        assert!(!want_cart.matches(&r, &[], ViewerFlags::default()));

        let not_favorited = RecipeFilter {
            is_favorited: Some(false),
            ..Default::default()
        };
        assert!(not_favorited.matches(&r, &[], in_cart));
    }
}
