pub mod auth;
pub mod cart;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/github/login                               redirect to GitHub (public)
/// /auth/github/callback                            OAuth callback (public)
/// /auth/me                                         current user profile
///
/// /cart-items                                      list, create
/// /cart-items/{id}                                 get, update, delete
/// /cart-items/{id}/images                          attach image (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/cart-items", cart::router())
}
