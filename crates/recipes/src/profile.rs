//! Author profiles as shown next to recipes and subscriptions.

use serde::{Deserialize, Serialize};

use foodgram_core::{Entity, UserId};

/// Public profile of a user.
///
/// Profiles are provisioned by the identity service; this crate only reads
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl Entity for UserProfile {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
