//! Per-user relations: shopping cart, favorites, subscriptions.
//!
//! Each relation is a set of pairs; uniqueness of the pair is enforced by the
//! store that holds it.

use serde::{Deserialize, Serialize};

use foodgram_core::{DomainError, DomainResult, RecipeId, UserId};

/// A recipe the user intends to cook (and shop for).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartEntry {
    pub user: UserId,
    pub recipe: RecipeId,
}

/// A recipe the user bookmarked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub user: UserId,
    pub recipe: RecipeId,
}

/// `user` follows `author`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    pub user: UserId,
    pub author: UserId,
}

impl Subscription {
    /// Users cannot subscribe to themselves.
    pub fn new(user: UserId, author: UserId) -> DomainResult<Self> {
        if user == author {
            return Err(DomainError::validation("cannot subscribe to yourself"));
        }
        Ok(Self { user, author })
    }
}
