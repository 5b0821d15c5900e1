//! Cart item image entity model.

use opencart_core::dto::CartItemImageDto;
use opencart_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `cart_item_images` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CartItemImage {
    pub id: DbId,
    /// The cart item this image was added to. Never reassigned.
    pub cart_item_id: DbId,
    pub file_name: String,
    pub file_bytes: Vec<u8>,
    pub content_type: String,
    pub description: Option<String>,
    pub length: i64,
    /// Display name.
    pub name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_deleted: bool,
}

impl CartItemImage {
    /// A new, not yet persisted image attached to `cart_item_id`.
    ///
    /// Expects `input` to have passed validation, so the required fields are
    /// present.
    pub fn new(cart_item_id: DbId, input: CartItemImageDto, now: Timestamp) -> Self {
        Self {
            id: DbId::new_v4(),
            cart_item_id,
            file_name: input.file_name.unwrap_or_default(),
            file_bytes: input.file_bytes,
            content_type: input.content_type.unwrap_or_default(),
            description: input.description,
            length: input.length,
            name: input.name,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }
}

impl From<CartItemImage> for CartItemImageDto {
    fn from(image: CartItemImage) -> Self {
        Self {
            id: image.id,
            file_name: Some(image.file_name),
            file_bytes: image.file_bytes,
            content_type: Some(image.content_type),
            description: image.description,
            length: image.length,
            name: image.name,
        }
    }
}
