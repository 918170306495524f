//! Recipe composition: a recipe and its ingredient lines.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodgram_core::{DomainError, DomainResult, Entity, IngredientId, RecipeId, TagId, UserId};

use crate::text::{MAX_SHORT_TEXT, require_text};

/// One ingredient line of a recipe: which catalog ingredient, how much of it.
///
/// The amount is in the ingredient's own measurement unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub ingredient_id: IngredientId,
    pub amount: u32,
}

/// Author-supplied recipe content, validated before it becomes a `Recipe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    /// Minutes.
    pub cooking_time: u32,
    pub image: Option<String>,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientAmount>,
}

impl RecipeDraft {
    /// Check the draft's own invariants.
    ///
    /// Whether the referenced tags and ingredients exist is a catalog question
    /// and is answered by the caller.
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name, MAX_SHORT_TEXT)?;

        if self.text.trim().is_empty() {
            return Err(DomainError::validation("text cannot be empty"));
        }

        if self.cooking_time < 1 {
            return Err(DomainError::validation(
                "cooking_time must be at least 1 minute",
            ));
        }

        if self.tags.is_empty() {
            return Err(DomainError::validation("at least one tag is required"));
        }

        if self.ingredients.is_empty() {
            return Err(DomainError::validation(
                "at least one ingredient is required",
            ));
        }

        let mut seen = HashSet::with_capacity(self.ingredients.len());
        for line in &self.ingredients {
            if line.amount < 1 {
                return Err(DomainError::validation(format!(
                    "amount for ingredient {} must be at least 1",
                    line.ingredient_id
                )));
            }
            if !seen.insert(line.ingredient_id) {
                return Err(DomainError::validation(format!(
                    "ingredient {} is listed more than once",
                    line.ingredient_id
                )));
            }
        }

        Ok(())
    }

    /// Tag ids without repeats, first occurrence wins.
    fn distinct_tags(&self) -> Vec<TagId> {
        let mut seen = HashSet::new();
        self.tags
            .iter()
            .copied()
            .filter(|t| seen.insert(*t))
            .collect()
    }
}

/// A published recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub author: UserId,
    pub name: String,
    pub text: String,
    pub cooking_time: u32,
    pub image: Option<String>,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientAmount>,
    pub published_at: DateTime<Utc>,
}

impl Recipe {
    /// Validate a draft and publish it under `author`.
    pub fn publish(
        id: RecipeId,
        author: UserId,
        draft: RecipeDraft,
        published_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        draft.validate()?;
        let tags = draft.distinct_tags();

        Ok(Self {
            id,
            author,
            name: draft.name,
            text: draft.text,
            cooking_time: draft.cooking_time,
            image: draft.image,
            tags,
            ingredients: draft.ingredients,
            published_at,
        })
    }

    /// Replace the recipe's content with a new draft.
    ///
    /// Identity, author and publication time are kept. The ingredient line set
    /// is replaced wholesale.
    pub fn revise(&mut self, draft: RecipeDraft) -> DomainResult<()> {
        draft.validate()?;
        self.tags = draft.distinct_tags();
        self.name = draft.name;
        self.text = draft.text;
        self.cooking_time = draft.cooking_time;
        self.image = draft.image;
        self.ingredients = draft.ingredients;
        Ok(())
    }

    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author == user
    }
}

impl Entity for Recipe {
    type Id = RecipeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecipeDraft {
        RecipeDraft {
            name: "Pancakes".to_string(),
            text: "Mix and fry.".to_string(),
            cooking_time: 20,
            image: None,
            tags: vec![TagId::new()],
            ingredients: vec![
                IngredientAmount {
                    ingredient_id: IngredientId::new(),
                    amount: 200,
                },
                IngredientAmount {
                    ingredient_id: IngredientId::new(),
                    amount: 2,
                },
            ],
        }
    }

    fn expect_validation(draft: RecipeDraft) {
        match draft.validate() {
            Err(DomainError::Validation(_)) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn publish_keeps_author_and_lines() {
        let author = UserId::new();
        let recipe = Recipe::publish(RecipeId::new(), author, draft(), Utc::now()).unwrap();
        assert!(recipe.is_authored_by(author));
        assert!(!recipe.is_authored_by(UserId::new()));
        assert_eq!(recipe.ingredients.len(), 2);
    }

    #[test]
    fn rejects_zero_cooking_time() {
        let mut d = draft();
        d.cooking_time = 0;
        expect_validation(d);
    }

    #[test]
    fn rejects_zero_amount() {
        let mut d = draft();
        d.ingredients[0].amount = 0;
        expect_validation(d);
    }

    #[test]
    fn rejects_repeated_ingredient() {
        let mut d = draft();
        let repeated = d.ingredients[0];
        d.ingredients.push(repeated);
        expect_validation(d);
    }

    #[test]
    fn rejects_missing_tags_and_ingredients() {
        let mut d = draft();
        d.tags.clear();
        expect_validation(d);

        let mut d = draft();
        d.ingredients.clear();
        expect_validation(d);
    }

    #[test]
    fn rejects_blank_name_and_text() {
        let mut d = draft();
        d.name = " ".to_string();
        expect_validation(d);

        let mut d = draft();
        d.text = String::new();
        expect_validation(d);
    }

    #[test]
    fn repeated_tags_are_collapsed() {
        let mut d = draft();
        let tag = d.tags[0];
        d.tags.push(tag);
        let recipe = Recipe::publish(RecipeId::new(), UserId::new(), d, Utc::now()).unwrap();
        assert_eq!(recipe.tags, vec![tag]);
    }

    #[test]
    fn revise_replaces_content_but_not_identity() {
        let author = UserId::new();
        let id = RecipeId::new();
        let published_at = Utc::now();
        let mut recipe = Recipe::publish(id, author, draft(), published_at).unwrap();

        let mut next = draft();
        next.name = "Crepes".to_string();
        next.ingredients.truncate(1);
        recipe.revise(next).unwrap();

        assert_eq!(recipe.id, id);
        assert_eq!(recipe.author, author);
        assert_eq!(recipe.published_at, published_at);
        assert_eq!(recipe.name, "Crepes");
        assert_eq!(recipe.ingredients.len(), 1);
    }

    #[test]
    fn failed_revise_leaves_recipe_untouched() {
        let mut recipe =
            Recipe::publish(RecipeId::new(), UserId::new(), draft(), Utc::now()).unwrap();
        let before = recipe.clone();

        let mut bad = draft();
        bad.cooking_time = 0;
        assert!(recipe.revise(bad).is_err());
        assert_eq!(recipe, before);
    }
}
