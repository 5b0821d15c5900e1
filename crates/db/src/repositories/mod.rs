//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Reads exclude soft-deleted
//! rows.

pub mod cart_item_image_repo;
pub mod cart_item_repo;
pub mod user_repo;

pub use cart_item_image_repo::CartItemImageRepo;
pub use cart_item_repo::CartItemRepo;
pub use user_repo::UserRepo;
