//! Access tokens and OAuth `state` tokens.
//!
//! Both are HS256-signed JWTs sharing one secret. Access tokens carry the
//! identity claims fetched from GitHub so every request can resolve the
//! caller without another provider round-trip. State tokens carry nothing
//! but a purpose and a short expiry. The server keeps no session for the
//! OAuth redirect; the browser holds the state in a cookie instead.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use opencart_core::identity::IdentityClaims;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the provider-side account id.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

impl Claims {
    /// The identity this token was minted for.
    pub fn identity(&self) -> IdentityClaims {
        IdentityClaims {
            provider_id: self.sub.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            location: self.location.clone(),
        }
    }
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

/// OAuth state tokens expire quickly; the user is mid-redirect.
pub const STATE_TOKEN_EXPIRY_MINS: i64 = 10;

const OAUTH_STATE_PURPOSE: &str = "github_oauth_state";

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Access token lifetime in seconds.
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Generate an HS256 access token for the given identity.
pub fn generate_access_token(
    identity: &IdentityClaims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: identity.provider_id.clone(),
        name: identity.name.clone(),
        email: identity.email.clone(),
        location: identity.location.clone(),
        exp: now + config.access_token_expiry_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[derive(Debug, Serialize, Deserialize)]
struct OAuthStateClaims {
    purpose: String,
    exp: i64,
    iat: i64,
    jti: String,
}

/// Mint a short-lived token to round-trip through GitHub as `state`.
pub fn generate_state_token(config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = OAuthStateClaims {
        purpose: OAUTH_STATE_PURPOSE.to_string(),
        exp: now + STATE_TOKEN_EXPIRY_MINS * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check a `state` value returned by GitHub.
///
/// Rejects access tokens presented as state, bad signatures and expired
/// tokens.
pub fn validate_state_token(
    token: &str,
    config: &JwtConfig,
) -> Result<(), jsonwebtoken::errors::Error> {
    let data = decode::<OAuthStateClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    if data.claims.purpose != OAUTH_STATE_PURPOSE {
        return Err(ErrorKind::InvalidToken.into());
    }
    Ok(())
}
