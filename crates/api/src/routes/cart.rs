//! Route definitions for the `/cart-items` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

/// Routes mounted at `/cart-items`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/images   -> add_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::list).post(cart::create))
        .route(
            "/{id}",
            get(cart::get_by_id).put(cart::update).delete(cart::delete),
        )
        .route("/{id}/images", post(cart::add_image))
}
