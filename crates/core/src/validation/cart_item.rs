//! Rules for cart item payloads.

use rust_decimal::Decimal;

use super::{char_len, is_blank};
use crate::dto::CartItemDto;

pub const MAX_NAME_LENGTH: usize = 155;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Decimal places kept by the `price NUMERIC(18, 2)` column.
pub const MAX_PRICE_SCALE: u32 = 2;

/// Largest price the `NUMERIC(18, 2)` column holds.
pub fn max_price() -> Decimal {
    Decimal::new(999_999_999_999_999_999, MAX_PRICE_SCALE)
}

/// Validate a cart item payload, returning every violated rule.
///
/// Rules run description, price, name, quantity. Each rule reports on its
/// own, so one field may contribute more than one message.
pub fn validate_cart_item(item: &CartItemDto) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(description) = &item.description {
        if char_len(description) > MAX_DESCRIPTION_LENGTH {
            errors.push(format!(
                "Description must not exceed {MAX_DESCRIPTION_LENGTH} characters."
            ));
        }
    }

    if item.price <= Decimal::ZERO {
        errors.push("Price must be greater than 0.".to_string());
    }
    // Trailing zeros are fine: 9.990 is stored as 9.99.
    if item.price.normalize().scale() > MAX_PRICE_SCALE {
        errors.push(format!(
            "Price must not have more than {MAX_PRICE_SCALE} decimal places."
        ));
    }
    if item.price > max_price() {
        errors.push(format!("Price must not exceed {}.", max_price()));
    }

    if is_blank(Some(item.name.as_str())) {
        errors.push("Name is required.".to_string());
    } else if char_len(&item.name) > MAX_NAME_LENGTH {
        errors.push(format!(
            "Name must not exceed {MAX_NAME_LENGTH} characters."
        ));
    }

    if item.quantity <= 0 {
        errors.push("Quantity must be greater than 0.".to_string());
    }

    errors
}
