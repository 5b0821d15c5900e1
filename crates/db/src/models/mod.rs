//! Row types for every table, with conversions to transport shapes.

pub mod cart_item;
pub mod cart_item_image;
pub mod user;
