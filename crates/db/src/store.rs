//! Store traits consumed by the service layer.
//!
//! The service holds these as `Arc<dyn …>` so it can run against
//! PostgreSQL in production and an in-memory store in tests. Every write
//! returns `Ok(None)` when the store accepted the call but produced no row.

use async_trait::async_trait;
use opencart_core::pagination::{Page, PageRequest};
use opencart_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::cart_item::CartItem;
use crate::models::cart_item_image::CartItemImage;
use crate::models::user::User;
use crate::repositories::{CartItemImageRepo, CartItemRepo, UserRepo};
use crate::DbPool;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: &User) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;
    async fn find_by_auth_provider_id(
        &self,
        auth_provider_id: &str,
    ) -> Result<Option<User>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn update_auth_provider_id(
        &self,
        id: DbId,
        auth_provider_id: &str,
        updated_at: Timestamp,
    ) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait CartItemStore: Send + Sync {
    async fn create(&self, item: &CartItem) -> Result<Option<CartItem>, StoreError>;
    async fn find_by_id(&self, id: DbId) -> Result<Option<CartItem>, StoreError>;
    /// Ownership-scoped lookup: matches only when both ids agree.
    async fn find_owned(&self, id: DbId, user_id: DbId) -> Result<Option<CartItem>, StoreError>;
    async fn update(&self, item: &CartItem) -> Result<Option<CartItem>, StoreError>;
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;
    async fn list_for_user(
        &self,
        user_id: DbId,
        request: PageRequest,
    ) -> Result<Page<CartItem>, StoreError>;
}

#[async_trait]
pub trait CartItemImageStore: Send + Sync {
    async fn create(&self, image: &CartItemImage) -> Result<Option<CartItemImage>, StoreError>;
    async fn find_by_id(&self, id: DbId) -> Result<Option<CartItemImage>, StoreError>;
    async fn list_for_cart_item(&self, cart_item_id: DbId)
        -> Result<Vec<CartItemImage>, StoreError>;
}

/// Liveness check for the health endpoint.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// PostgreSQL-backed implementation of every store trait.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, user: &User) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::create(&self.pool, user).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_auth_provider_id(
        &self,
        auth_provider_id: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_auth_provider_id(&self.pool, auth_provider_id).await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_username(&self.pool, username).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn update_auth_provider_id(
        &self,
        id: DbId,
        auth_provider_id: &str,
        updated_at: Timestamp,
    ) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::update_auth_provider_id(&self.pool, id, auth_provider_id, updated_at).await?)
    }
}

#[async_trait]
impl CartItemStore for PgStore {
    async fn create(&self, item: &CartItem) -> Result<Option<CartItem>, StoreError> {
        Ok(CartItemRepo::create(&self.pool, item).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<CartItem>, StoreError> {
        Ok(CartItemRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_owned(&self, id: DbId, user_id: DbId) -> Result<Option<CartItem>, StoreError> {
        Ok(CartItemRepo::find_owned(&self.pool, id, user_id).await?)
    }

    async fn update(&self, item: &CartItem) -> Result<Option<CartItem>, StoreError> {
        Ok(CartItemRepo::update(&self.pool, item).await?)
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(CartItemRepo::delete(&self.pool, id).await?)
    }

    async fn list_for_user(
        &self,
        user_id: DbId,
        request: PageRequest,
    ) -> Result<Page<CartItem>, StoreError> {
        Ok(CartItemRepo::list_for_user(&self.pool, user_id, request).await?)
    }
}

#[async_trait]
impl CartItemImageStore for PgStore {
    async fn create(&self, image: &CartItemImage) -> Result<Option<CartItemImage>, StoreError> {
        Ok(CartItemImageRepo::create(&self.pool, image).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<CartItemImage>, StoreError> {
        Ok(CartItemImageRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_for_cart_item(
        &self,
        cart_item_id: DbId,
    ) -> Result<Vec<CartItemImage>, StoreError> {
        Ok(CartItemImageRepo::list_for_cart_item(&self.pool, cart_item_id).await?)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
