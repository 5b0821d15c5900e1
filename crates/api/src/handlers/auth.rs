//! Handlers for the `/auth` resource: GitHub login, callback and the
//! current-user profile.

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderName};
use axum::response::Redirect;
use axum::Json;
use opencart_core::error::CoreError;
use opencart_core::types::{DbId, UserId};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_state_token, validate_state_token};
use crate::auth::state_cookie::{clear_state_cookie, read_state_cookie, set_state_cookie};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters GitHub appends to the callback URL.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set when the user denied access or the app is misconfigured.
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Successful authentication response returned by the callback.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user_id: UserId,
}

/// Profile returned by `GET /auth/me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: DbId,
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/auth/github/login
///
/// Redirect the browser to GitHub's authorize page, remembering the
/// `state` in a cookie for the callback.
pub async fn github_login(
    State(state): State<AppState>,
) -> AppResult<([(HeaderName, String); 1], Redirect)> {
    let oauth_state = generate_state_token(&state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to sign OAuth state: {e}")))?;

    let url = state
        .identity_provider
        .authorize_url(&oauth_state)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok((
        [(SET_COOKIE, set_state_cookie(&oauth_state))],
        Redirect::to(&url),
    ))
}

/// GET /api/v1/auth/github/callback
///
/// Exchange the authorization code, provision the user on first login and
/// mint an access token.
pub async fn github_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> AppResult<([(HeaderName, String); 1], Json<TokenResponse>)> {
    // 1. Provider-reported failure.
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!(error = %error, description = %description, "GitHub OAuth error");
        return Err(AppError::Unauthorized(
            "GitHub authorization was denied".into(),
        ));
    }

    // 2. Required parameters.
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        tracing::warn!("GitHub OAuth callback missing code");
        return Err(AppError::BadRequest("Missing authorization code".into()));
    };
    let Some(oauth_state) = query.state else {
        tracing::warn!("GitHub OAuth callback missing state");
        return Err(AppError::BadRequest("Missing OAuth state".into()));
    };

    // 3. CSRF check: signed by us and started in this browser.
    if let Err(e) = validate_state_token(&oauth_state, &state.config.jwt) {
        tracing::warn!(error = %e, "GitHub OAuth state rejected");
        return Err(AppError::Unauthorized("Invalid or expired OAuth state".into()));
    }
    if read_state_cookie(&headers) != Some(oauth_state.as_str()) {
        tracing::warn!("GitHub OAuth state does not match the login cookie");
        return Err(AppError::Unauthorized("Invalid or expired OAuth state".into()));
    }

    // 4. Code -> provider token -> identity.
    let provider_token = state
        .identity_provider
        .exchange_code(&code)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "GitHub code exchange failed");
            AppError::Unauthorized("GitHub token exchange failed".into())
        })?;

    let identity = state
        .identity_provider
        .fetch_identity(&provider_token)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to fetch GitHub user: {e}")))?;

    // 5. Provision or look up the user.
    let user_id = state.users.resolve_identity(Some(&identity)).await;
    if user_id.is_empty() {
        tracing::warn!(provider_id = %identity.provider_id, "Could not provision user");
        return Err(AppError::Unauthorized(
            "Unable to sign in with this GitHub account".into(),
        ));
    }

    // 6. Mint our own access token.
    let access_token = generate_access_token(&identity, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = %user_id, "User signed in with GitHub");

    Ok((
        [(SET_COOKIE, clear_state_cookie())],
        Json(TokenResponse {
            access_token,
            token_type: "Bearer",
            expires_in: state.config.jwt.access_token_expiry_secs(),
            user_id,
        }),
    ))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<DataResponse<UserInfo>>> {
    if !user.is_authenticated() {
        return Err(AppError::Unauthorized("Authentication required".into()));
    }

    let record = state
        .users
        .find_by_user_id(&user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::UserNotFound))?;

    Ok(Json(DataResponse {
        data: UserInfo {
            id: record.id,
            user_id: record.auth_provider_id,
            username: record.username,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
        },
    }))
}
