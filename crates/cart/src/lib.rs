//! Cart-item lifecycle and user provisioning.
//!
//! Both services sit on the store traits from `opencart-db` and never
//! surface a store error, panic or cancellation to their caller as anything
//! but a [`CoreError`].

mod boundary;
pub mod cart_service;
pub mod user_service;

use opencart_core::error::CoreError;

pub use cart_service::CartService;
pub use user_service::UserService;

/// Result of every service operation.
pub type ServiceResult<T> = Result<T, CoreError>;
