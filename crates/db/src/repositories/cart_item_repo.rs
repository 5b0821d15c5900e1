//! Repository for the `cart_items` table.

use opencart_core::pagination::{Page, PageRequest};
use opencart_core::types::DbId;
use sqlx::PgPool;

use crate::models::cart_item::CartItem;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, name, description, price, quantity, created_at, updated_at, is_deleted";

/// Provides CRUD operations for cart items.
pub struct CartItemRepo;

impl CartItemRepo {
    /// Insert a new cart item, returning the created row.
    ///
    /// Returns `None` if a row with the same id already exists.
    pub async fn create(pool: &PgPool, item: &CartItem) -> Result<Option<CartItem>, sqlx::Error> {
        let query = format!(
            "INSERT INTO cart_items
                (id, user_id, name, description, price, quantity, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(item.id)
            .bind(item.user_id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price)
            .bind(item.quantity)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Find a cart item by id regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CartItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM cart_items WHERE id = $1 AND is_deleted = false");
        sqlx::query_as::<_, CartItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a cart item by id, only if it belongs to `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cart_items
             WHERE id = $1 AND user_id = $2 AND is_deleted = false"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Persist the editable fields and `updated_at` of an existing item.
    ///
    /// Returns `None` if the row no longer exists for its owner.
    pub async fn update(pool: &PgPool, item: &CartItem) -> Result<Option<CartItem>, sqlx::Error> {
        let query = format!(
            "UPDATE cart_items SET
                name = $3,
                description = $4,
                price = $5,
                quantity = $6,
                updated_at = $7
             WHERE id = $1 AND user_id = $2 AND is_deleted = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(item.id)
            .bind(item.user_id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price)
            .bind(item.quantity)
            .bind(item.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a cart item and, by cascade, its images.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of a user's cart items, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        request: PageRequest,
    ) -> Result<Page<CartItem>, sqlx::Error> {
        let (total_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM cart_items WHERE user_id = $1 AND is_deleted = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM cart_items
             WHERE user_id = $1 AND is_deleted = false
             ORDER BY created_at DESC, id
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(items, request, total_count))
    }
}
