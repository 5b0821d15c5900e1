//! Domain types, transport shapes and validation rules for the cart backend.
//!
//! This crate has no I/O; the store lives in `opencart-db` and orchestration
//! in `opencart-cart`.

pub mod dto;
pub mod error;
pub mod identity;
pub mod pagination;
pub mod types;
pub mod validation;
