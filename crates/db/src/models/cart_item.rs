//! Cart item entity model.

use opencart_core::dto::CartItemDto;
use opencart_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A row from the `cart_items` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CartItem {
    pub id: DbId,
    /// Owning user. Set from the resolved identity, never from client input.
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_deleted: bool,
}

impl CartItem {
    /// A new, not yet persisted item owned by `user_id`.
    ///
    /// Only the editable fields are taken from `input`; its `id` is ignored.
    pub fn new(user_id: DbId, input: &CartItemDto, now: Timestamp) -> Self {
        Self {
            id: DbId::new_v4(),
            user_id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            quantity: input.quantity,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }

    /// Overwrite the editable fields from `input` and bump `updated_at`.
    ///
    /// `id`, `user_id` and `created_at` are left untouched.
    pub fn apply(&mut self, input: &CartItemDto, now: Timestamp) {
        self.name = input.name.clone();
        self.description = input.description.clone();
        self.price = input.price;
        self.quantity = input.quantity;
        self.updated_at = now;
    }
}

impl From<CartItem> for CartItemDto {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price,
            quantity: item.quantity,
        }
    }
}
