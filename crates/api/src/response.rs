//! Shared response envelope types for API handlers.
//!
//! Single-resource responses use a `{ "data": ... }` envelope. Paged lists
//! return [`opencart_core::pagination::Page`] directly, whose top-level
//! `data` field keeps the same shape for clients.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: item }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
