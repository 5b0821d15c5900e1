//! Request identity extractor for Axum handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use opencart_core::types::UserId;

use crate::auth::jwt::{validate_token, Claims};
use crate::state::AppState;

/// The caller's resolved identity.
///
/// Reads `Authorization: Bearer <token>`, validates it and resolves the
/// embedded claims to a user, provisioning one on first sight. Never
/// rejects: an absent or invalid token yields an empty `user_id`, and the
/// cart service turns that into the appropriate error.
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Resolved user id; empty when unauthenticated.
    pub user_id: UserId,
    /// Validated token claims, if a valid token was presented.
    pub claims: Option<Claims>,
}

impl CurrentUser {
    pub fn is_authenticated(&self) -> bool {
        !self.user_id.is_empty()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_token(parts).and_then(|token| {
            validate_token(token, &state.config.jwt)
                .map_err(|e| tracing::debug!(error = %e, "Ignoring invalid access token"))
                .ok()
        });

        let identity = claims.as_ref().map(Claims::identity);
        let user_id = state.users.resolve_identity(identity.as_ref()).await;

        Ok(CurrentUser { user_id, claims })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
