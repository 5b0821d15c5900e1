//! GitHub OAuth: authorize redirect, code exchange and user-info fetch.
//!
//! Handlers talk to [`IdentityProvider`] so tests can swap in a fake;
//! [`GitHubClient`] is the production implementation.

use async_trait::async_trait;
use opencart_core::identity::IdentityClaims;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use url::Url;

pub const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const API_BASE_URL: &str = "https://api.github.com";

/// Profile plus email addresses, private ones included.
pub const SCOPE: &str = "read:user user:email";

/// GitHub rejects API calls without a User-Agent.
const USER_AGENT: &str = concat!("opencart-api/", env!("CARGO_PKG_VERSION"));

const DEFAULT_REDIRECT_URL: &str = "http://localhost:3000/api/v1/auth/github/callback";

/// OAuth application credentials.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the callback URL registered with the OAuth app.
    pub redirect_url: String,
}

impl GitHubConfig {
    /// Load GitHub OAuth configuration from environment variables.
    ///
    /// | Env Var                | Required | Default                                             |
    /// |------------------------|----------|-----------------------------------------------------|
    /// | `GITHUB_CLIENT_ID`     | **yes**  | --                                                  |
    /// | `GITHUB_CLIENT_SECRET` | **yes**  | --                                                  |
    /// | `GITHUB_REDIRECT_URL`  | no       | `http://localhost:3000/api/v1/auth/github/callback` |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or empty.
    pub fn from_env() -> Self {
        let client_id = std::env::var("GITHUB_CLIENT_ID")
            .expect("GITHUB_CLIENT_ID must be set in the environment");
        assert!(!client_id.is_empty(), "GITHUB_CLIENT_ID must not be empty");

        let client_secret = std::env::var("GITHUB_CLIENT_SECRET")
            .expect("GITHUB_CLIENT_SECRET must be set in the environment");
        assert!(
            !client_secret.is_empty(),
            "GITHUB_CLIENT_SECRET must not be empty"
        );

        let redirect_url =
            std::env::var("GITHUB_REDIRECT_URL").unwrap_or_else(|_| DEFAULT_REDIRECT_URL.into());

        Self {
            client_id,
            client_secret,
            redirect_url,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered but refused the request (bad code, revoked app, ...).
    #[error("GitHub OAuth error: {0}")]
    OAuth(String),

    #[error("Invalid GitHub URL: {0}")]
    Url(#[from] url::ParseError),
}

/// The provider contract the auth handlers depend on.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL to send the browser to, carrying `state` for CSRF protection.
    fn authorize_url(&self, state: &str) -> Result<String, GitHubError>;

    /// Trade an authorization code for a provider access token.
    async fn exchange_code(&self, code: &str) -> Result<String, GitHubError>;

    /// Fetch the identity behind a provider access token.
    async fn fetch_identity(&self, access_token: &str) -> Result<IdentityClaims, GitHubError>;
}

/// Response body of the token endpoint. Errors come back as 200 with
/// `error` set.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Subset of `GET /user`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}

/// One entry of `GET /user/emails`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEmail {
    pub email: String,
    pub primary: bool,
    pub verified: bool,
}

/// Map a GitHub profile to identity claims.
///
/// The public profile email wins; otherwise the primary verified address
/// from `emails` is used. A missing display name falls back to the login.
pub fn identity_from_user(user: GitHubUser, emails: &[GitHubEmail]) -> IdentityClaims {
    let email = non_blank(user.email).or_else(|| primary_verified_email(emails));
    let name = non_blank(user.name).unwrap_or(user.login);
    IdentityClaims {
        provider_id: user.id.to_string(),
        name: Some(name),
        email,
        location: non_blank(user.location),
    }
}

pub fn primary_verified_email(emails: &[GitHubEmail]) -> Option<String> {
    emails
        .iter()
        .find(|e| e.primary && e.verified)
        .map(|e| e.email.clone())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Production [`IdentityProvider`] backed by github.com.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, config })
    }

    async fn fetch_emails(&self, access_token: &str) -> Result<Vec<GitHubEmail>, GitHubError> {
        let emails = self
            .http
            .get(format!("{API_BASE_URL}/user/emails"))
            .bearer_auth(access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<GitHubEmail>>()
            .await?;
        Ok(emails)
    }
}

#[async_trait]
impl IdentityProvider for GitHubClient {
    fn authorize_url(&self, state: &str) -> Result<String, GitHubError> {
        build_authorize_url(&self.config, state)
    }

    async fn exchange_code(&self, code: &str) -> Result<String, GitHubError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let response = self
            .http
            .post(TOKEN_URL)
            .header(ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GitHubError::OAuth(format!(
                "Token exchange failed ({status}): {text}"
            )));
        }

        let body: TokenResponse = response.json().await?;
        match (body.access_token, body.error) {
            (Some(token), None) => Ok(token),
            (_, Some(error)) => Err(GitHubError::OAuth(format!(
                "{error}: {}",
                body.error_description.unwrap_or_default()
            ))),
            (None, None) => Err(GitHubError::OAuth(
                "Token response carried no access token".to_string(),
            )),
        }
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<IdentityClaims, GitHubError> {
        let user = self
            .http
            .get(format!("{API_BASE_URL}/user"))
            .bearer_auth(access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json::<GitHubUser>()
            .await?;

        let emails = if non_blank(user.email.clone()).is_some() {
            Vec::new()
        } else {
            match self.fetch_emails(access_token).await {
                Ok(emails) => emails,
                Err(e) => {
                    tracing::warn!(github_id = user.id, error = %e, "Could not list GitHub emails");
                    Vec::new()
                }
            }
        };

        Ok(identity_from_user(user, &emails))
    }
}

/// Build the authorize URL with every parameter query-encoded.
pub fn build_authorize_url(config: &GitHubConfig, state: &str) -> Result<String, GitHubError> {
    let url = Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_url.as_str()),
            ("scope", SCOPE),
            ("state", state),
        ],
    )?;
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GitHubConfig {
        GitHubConfig {
            client_id: "client-123".to_string(),
            client_secret: "shh".to_string(),
            redirect_url: DEFAULT_REDIRECT_URL.to_string(),
        }
    }

    fn octocat() -> GitHubUser {
        GitHubUser {
            id: 583231,
            login: "octocat".to_string(),
            name: Some("The Octocat".to_string()),
            email: Some("octocat@github.com".to_string()),
            location: Some("San Francisco".to_string()),
        }
    }

    #[test]
    fn authorize_url_carries_every_parameter() {
        let raw = build_authorize_url(&config(), "state-token").unwrap();
        let url = Url::parse(&raw).unwrap();
        assert_eq!(url.host_str(), Some("github.com"));
        assert_eq!(url.path(), "/login/oauth/authorize");

        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["redirect_uri"], DEFAULT_REDIRECT_URL);
        assert_eq!(params["scope"], "read:user user:email");
        assert_eq!(params["state"], "state-token");
        assert!(!raw.contains("client_secret"));
    }

    #[test]
    fn maps_public_profile() {
        let claims = identity_from_user(octocat(), &[]);
        assert_eq!(claims.provider_id, "583231");
        assert_eq!(claims.name.as_deref(), Some("The Octocat"));
        assert_eq!(claims.email.as_deref(), Some("octocat@github.com"));
        assert_eq!(claims.location.as_deref(), Some("San Francisco"));
    }

    #[test]
    fn private_email_falls_back_to_primary_verified() {
        let user = GitHubUser {
            email: None,
            ..octocat()
        };
        let emails = vec![
            GitHubEmail {
                email: "old@example.com".to_string(),
                primary: false,
                verified: true,
            },
            GitHubEmail {
                email: "unverified@example.com".to_string(),
                primary: true,
                verified: false,
            },
            GitHubEmail {
                email: "main@example.com".to_string(),
                primary: true,
                verified: true,
            },
        ];
        let claims = identity_from_user(user, &emails);
        assert_eq!(claims.email.as_deref(), Some("main@example.com"));
    }

    #[test]
    fn no_usable_email_leaves_claim_empty() {
        let user = GitHubUser {
            email: Some("  ".to_string()),
            ..octocat()
        };
        assert_eq!(identity_from_user(user, &[]).email, None);
    }

    #[test]
    fn missing_name_falls_back_to_login() {
        let user = GitHubUser {
            name: None,
            ..octocat()
        };
        assert_eq!(
            identity_from_user(user, &[]).name.as_deref(),
            Some("octocat")
        );
    }

    #[test]
    fn user_payload_deserializes_with_nulls() {
        let user: GitHubUser = serde_json::from_value(serde_json::json!({
            "id": 1,
            "login": "someone",
            "name": null,
            "email": null,
            "location": null,
            "avatar_url": "https://avatars.githubusercontent.com/u/1"
        }))
        .unwrap();
        assert_eq!(user.login, "someone");
        assert!(user.email.is_none());
    }
}
