//! Repository for the `users` table.

use opencart_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, first_name, last_name, auth_provider_id, \
                       created_at, updated_at, is_deleted";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Returns `None` if the id, username or auth-provider id is already
    /// taken, which is how a lost first-login race surfaces.
    pub async fn create(pool: &PgPool, user: &User) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "INSERT INTO users
                (id, username, email, first_name, last_name, auth_provider_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.auth_provider_id)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND is_deleted = false");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by the identity provider's account id.
    pub async fn find_by_auth_provider_id(
        pool: &PgPool,
        auth_provider_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE auth_provider_id = $1 AND is_deleted = false"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(auth_provider_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE username = $1 AND is_deleted = false");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1 AND is_deleted = false
             ORDER BY created_at
             LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Re-link a user to a different provider account.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update_auth_provider_id(
        pool: &PgPool,
        id: DbId,
        auth_provider_id: &str,
        updated_at: Timestamp,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET auth_provider_id = $2, updated_at = $3
             WHERE id = $1 AND is_deleted = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(auth_provider_id)
            .bind(updated_at)
            .fetch_optional(pool)
            .await
    }
}
