#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use opencart_api::auth::github::{build_authorize_url, GitHubConfig, GitHubError, IdentityProvider};
use opencart_api::auth::jwt::{generate_access_token, JwtConfig};
use opencart_api::config::ServerConfig;
use opencart_api::router::build_app_router;
use opencart_api::state::AppState;
use opencart_core::identity::IdentityClaims;
use opencart_db::memory::MemoryStore;

/// The only code the fake provider accepts.
pub const GOOD_CODE: &str = "good-code";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        github: GitHubConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_url: "http://localhost:3000/api/v1/auth/github/callback".to_string(),
        },
    }
}

pub fn ada() -> IdentityClaims {
    IdentityClaims {
        provider_id: "1001".to_string(),
        name: Some("Ada Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        location: Some("London".to_string()),
    }
}

pub fn grace() -> IdentityClaims {
    IdentityClaims {
        provider_id: "1002".to_string(),
        name: Some("Grace Hopper".to_string()),
        email: Some("grace@example.com".to_string()),
        location: None,
    }
}

/// Stand-in for GitHub: accepts [`GOOD_CODE`] and returns a fixed identity.
pub struct FakeGitHub {
    config: GitHubConfig,
    identity: IdentityClaims,
}

#[async_trait]
impl IdentityProvider for FakeGitHub {
    fn authorize_url(&self, state: &str) -> Result<String, GitHubError> {
        build_authorize_url(&self.config, state)
    }

    async fn exchange_code(&self, code: &str) -> Result<String, GitHubError> {
        if code == GOOD_CODE {
            Ok("gho_test_token".to_string())
        } else {
            Err(GitHubError::OAuth("bad_verification_code".to_string()))
        }
    }

    async fn fetch_identity(&self, _access_token: &str) -> Result<IdentityClaims, GitHubError> {
        Ok(self.identity.clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub config: ServerConfig,
}

impl TestApp {
    /// Bearer token for `identity`, signed with the test secret.
    pub fn token_for(&self, identity: &IdentityClaims) -> String {
        generate_access_token(identity, &self.config.jwt).unwrap()
    }
}

/// Build the full application router over an in-memory store. The fake
/// GitHub signs everyone in as [`ada`].
pub fn build_test_app() -> TestApp {
    build_test_app_with(ada())
}

/// Like [`build_test_app`], with the fake GitHub returning `identity`.
pub fn build_test_app_with(identity: IdentityClaims) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FakeGitHub {
        config: config.github.clone(),
        identity,
    });

    let state = AppState::new(
        store.clone(),
        provider,
        Arc::new(config.clone()),
        CancellationToken::new(),
    );

    TestApp {
        router: build_app_router(state, &config),
        store,
        config,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    request(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    request(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    send(app, builder.body(body).unwrap()).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
