//! Route definitions for the `/auth` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET /github/login     -> github_login
/// GET /github/callback  -> github_callback
/// GET /me               -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/github/login", get(auth::github_login))
        .route("/github/callback", get(auth::github_callback))
        .route("/me", get(auth::me))
}
