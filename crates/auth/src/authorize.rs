use thiserror::Error;

use foodgram_core::UserId;

/// The authenticated actor of a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: only the author may change this recipe")]
    NotAuthor,
}

/// Authorship policy for recipe writes.
///
/// Anyone may read; only the author may update or delete.
///
/// - No IO
/// - No panics
pub fn authorize_author(principal: &Principal, author: UserId) -> Result<(), AuthzError> {
    if principal.user_id == author {
        Ok(())
    } else {
        Err(AuthzError::NotAuthor)
    }
}
