//! Repository for the `cart_item_images` table.

use opencart_core::types::DbId;
use sqlx::PgPool;

use crate::models::cart_item_image::CartItemImage;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, cart_item_id, file_name, file_bytes, content_type, description, \
                       length, name, created_at, updated_at, is_deleted";

/// Provides CRUD operations for cart item images.
pub struct CartItemImageRepo;

impl CartItemImageRepo {
    /// Insert a new image, returning the created row.
    ///
    /// Returns `None` if a row with the same id already exists.
    pub async fn create(
        pool: &PgPool,
        image: &CartItemImage,
    ) -> Result<Option<CartItemImage>, sqlx::Error> {
        let query = format!(
            "INSERT INTO cart_item_images
                (id, cart_item_id, file_name, file_bytes, content_type, description,
                 length, name, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CartItemImage>(&query)
            .bind(image.id)
            .bind(image.cart_item_id)
            .bind(&image.file_name)
            .bind(&image.file_bytes)
            .bind(&image.content_type)
            .bind(&image.description)
            .bind(image.length)
            .bind(&image.name)
            .bind(image.created_at)
            .bind(image.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Find an image by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CartItemImage>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM cart_item_images WHERE id = $1 AND is_deleted = false");
        sqlx::query_as::<_, CartItemImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All images attached to a cart item, oldest first.
    pub async fn list_for_cart_item(
        pool: &PgPool,
        cart_item_id: DbId,
    ) -> Result<Vec<CartItemImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cart_item_images
             WHERE cart_item_id = $1 AND is_deleted = false
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, CartItemImage>(&query)
            .bind(cart_item_id)
            .fetch_all(pool)
            .await
    }
}
