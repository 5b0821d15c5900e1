//! The cookie that pins an OAuth `state` to the browser that started login.
//!
//! The signed state alone proves we minted it, not that the callback comes
//! from the same browser. Login stores the state in an HttpOnly cookie and
//! the callback requires the query `state` to match it.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

use crate::auth::jwt::STATE_TOKEN_EXPIRY_MINS;

pub const STATE_COOKIE: &str = "oauth_state";

/// Scoped to the GitHub login and callback routes.
const STATE_COOKIE_PATH: &str = "/api/v1/auth/github";

/// `Set-Cookie` value carrying `state` for the length of the redirect.
pub fn set_state_cookie(state: &str) -> String {
    format!(
        "{STATE_COOKIE}={state}; Path={STATE_COOKIE_PATH}; Max-Age={}; HttpOnly; Secure; SameSite=Lax",
        STATE_TOKEN_EXPIRY_MINS * 60
    )
}

/// `Set-Cookie` value that drops the state cookie once it has been used.
pub fn clear_state_cookie() -> String {
    format!("{STATE_COOKIE}=; Path={STATE_COOKIE_PATH}; Max-Age=0; HttpOnly; Secure; SameSite=Lax")
}

/// The state cookie sent with the request, if any.
pub fn read_state_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == STATE_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
