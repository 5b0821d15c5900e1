//! User entity model.

use opencart_core::identity::UserProfile;
use opencart_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: DbId,
    /// Unique, email-shaped.
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Unique per identity provider. The only identity field that may change
    /// after creation.
    pub auth_provider_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_deleted: bool,
}

impl User {
    /// A new, not yet persisted user with a fresh id and both timestamps set
    /// to `now`.
    pub fn from_profile(profile: UserProfile, now: Timestamp) -> Self {
        Self {
            id: DbId::new_v4(),
            username: profile.username,
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            auth_provider_id: profile.auth_provider_id,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }
}
