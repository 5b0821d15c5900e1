//! Field rules for incoming payloads.
//!
//! Each entity has one pure function returning the ordered list of violated
//! rules as human-readable messages. An empty list means the payload is
//! valid. Callers run these before any lookup or write.

pub mod cart_item;
pub mod cart_item_image;
pub mod user;

pub use cart_item::validate_cart_item;
pub use cart_item_image::validate_cart_item_image;
pub use user::validate_user;

/// Length in characters, not bytes.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// True when `value` is absent or only whitespace.
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
