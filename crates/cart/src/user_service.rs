//! User provisioning and identity resolution.
//!
//! An authenticated identity is mapped to an application user on every
//! request. The first time an email is seen a user is created from the
//! provider's claims; afterwards the stored user is reused.

use std::sync::Arc;

use chrono::Utc;
use opencart_core::error::CoreError;
use opencart_core::identity::{IdentityClaims, UserProfile};
use opencart_core::types::UserId;
use opencart_core::validation::validate_user;
use opencart_db::models::user::User;
use opencart_db::store::UserStore;
use opencart_db::StoreError;

use crate::boundary::{recover, store_failure};
use crate::ServiceResult;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Validate and persist a new user.
    pub async fn create_user(&self, profile: UserProfile) -> ServiceResult<User> {
        const OP: &str = "create_user";
        let username = profile.username.clone();
        tracing::info!(username = %username, "Creating user");

        let violations = validate_user(&profile);
        if !violations.is_empty() {
            tracing::warn!(username = %username, ?violations, "User failed validation");
            return Err(CoreError::ValidationFailed(violations));
        }

        let user = User::from_profile(profile, Utc::now());
        match self.users.create(&user).await {
            Ok(Some(created)) => {
                tracing::info!(user_id = %created.id, username = %username, "User created");
                Ok(created)
            }
            Ok(None) => {
                tracing::warn!(username = %username, "User insert returned no row");
                Err(CoreError::PersistenceFailed("Failed to create user.".to_string()))
            }
            Err(e) => Err(store_failure(OP, &username, e)),
        }
    }

    /// Whether a live user with this username exists.
    pub async fn user_exists(&self, username: &str) -> ServiceResult<bool> {
        self.users
            .find_by_username(username)
            .await
            .map(|user| user.is_some())
            .map_err(|e| store_failure("user_exists", username, e))
    }

    /// Look up the user a resolved [`UserId`] refers to.
    pub async fn find_by_user_id(&self, user_id: &str) -> ServiceResult<Option<User>> {
        if user_id.trim().is_empty() {
            return Ok(None);
        }
        self.users
            .find_by_auth_provider_id(user_id)
            .await
            .map_err(|e| store_failure("find_by_user_id", user_id, e))
    }

    /// Map identity claims to the user's id, provisioning the user on first
    /// sight.
    ///
    /// Fails open: returns an empty id when there are no claims, the claims
    /// carry no email, or the user cannot be found or created.
    pub async fn resolve_identity(&self, claims: Option<&IdentityClaims>) -> UserId {
        let Some(claims) = claims else {
            return UserId::new();
        };
        let provider_id = claims.provider_id.as_str();

        match recover("resolve_identity", provider_id, self.resolve(claims)).await {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::warn!(provider_id, error = %e, "Identity resolution failed");
                UserId::new()
            }
        }
    }

    async fn resolve(&self, claims: &IdentityClaims) -> ServiceResult<UserId> {
        const OP: &str = "resolve_identity";
        let provider_id = claims.provider_id.trim();
        if provider_id.is_empty() {
            return Err(CoreError::InvalidArgument(
                "Identity carries no provider id.".to_string(),
            ));
        }
        let Some(username) = claims.username() else {
            return Err(CoreError::InvalidArgument(
                "Identity carries no email.".to_string(),
            ));
        };

        let existing = self
            .users
            .find_by_username(username)
            .await
            .map_err(|e| store_failure(OP, provider_id, e))?;
        if let Some(user) = existing {
            return self.relink(user, provider_id).await;
        }

        let profile = UserProfile::from_claims(claims).ok_or_else(|| {
            CoreError::InvalidArgument("Identity carries no email.".to_string())
        })?;
        match self.create_user(profile).await {
            Ok(user) => Ok(user.auth_provider_id),
            Err(CoreError::PersistenceFailed(_)) => self.reread_after_conflict(claims).await,
            Err(e) => Err(e),
        }
    }

    /// Point an existing user at a new provider account when the ids differ.
    async fn relink(&self, user: User, provider_id: &str) -> ServiceResult<UserId> {
        if user.auth_provider_id == provider_id {
            return Ok(user.auth_provider_id);
        }
        tracing::info!(
            user_id = %user.id,
            old_provider_id = %user.auth_provider_id,
            new_provider_id = provider_id,
            "Re-linking user to provider account",
        );
        let updated = match self
            .users
            .update_auth_provider_id(user.id, provider_id, Utc::now())
            .await
        {
            Ok(updated) => updated,
            Err(StoreError::Conflict { constraint }) => {
                // The provider account is already linked to another user.
                tracing::warn!(
                    user_id = %user.id,
                    provider_id,
                    constraint = %constraint,
                    "Provider id already linked to another user",
                );
                return self.linked_user(provider_id, "Failed to update user.").await;
            }
            Err(e) => return Err(store_failure("relink_user", provider_id, e)),
        };
        updated
            .map(|u| u.auth_provider_id)
            .ok_or_else(|| CoreError::PersistenceFailed("Failed to update user.".to_string()))
    }

    /// A concurrent first login may have inserted the user between our
    /// lookup and insert; the unique constraints reject ours, so read the
    /// winner back.
    async fn reread_after_conflict(&self, claims: &IdentityClaims) -> ServiceResult<UserId> {
        const OP: &str = "resolve_identity";
        let provider_id = claims.provider_id.trim();

        if let Some(username) = claims.username() {
            let by_username = self
                .users
                .find_by_username(username)
                .await
                .map_err(|e| store_failure(OP, provider_id, e))?;
            if let Some(user) = by_username {
                return Ok(user.auth_provider_id);
            }
        }

        self.linked_user(provider_id, "Failed to create user.").await
    }

    /// The id of the live user already holding `provider_id`.
    async fn linked_user(&self, provider_id: &str, failure: &str) -> ServiceResult<UserId> {
        self.users
            .find_by_auth_provider_id(provider_id)
            .await
            .map_err(|e| store_failure("resolve_identity", provider_id, e))?
            .map(|user| user.auth_provider_id)
            .ok_or_else(|| CoreError::PersistenceFailed(failure.to_string()))
    }
}
