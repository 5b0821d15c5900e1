//! In-memory implementation of the store traits.
//!
//! Mirrors the PostgreSQL semantics the service relies on: unique
//! usernames and provider ids, soft-deleted rows hidden from reads,
//! ownership-scoped updates and image cascade on delete. Adds knobs for
//! tests: call counters, an "unavailable" switch, silently rejected
//! writes, a panic trigger and artificial latency.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use opencart_core::pagination::{Page, PageRequest};
use opencart_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::cart_item::CartItem;
use crate::models::cart_item_image::CartItemImage;
use crate::models::user::User;
use crate::store::{CartItemImageStore, CartItemStore, StoreHealth, UserStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    cart_items: Vec<CartItem>,
    images: Vec<CartItemImage>,
}

/// Number of store calls observed, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub users: usize,
    pub cart_items: usize,
    pub images: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.users + self.cart_items + self.images
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    user_calls: AtomicUsize,
    cart_item_calls: AtomicUsize,
    image_calls: AtomicUsize,
    unavailable: AtomicBool,
    reject_writes: AtomicBool,
    panic_on_call: AtomicBool,
    latency_ms: AtomicUsize,
}

#[derive(Clone, Copy)]
enum Table {
    Users,
    CartItems,
    Images,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call fails with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Writes succeed but return no row, as if the insert or update was
    /// swallowed.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Every subsequent call panics.
    pub fn set_panic_on_call(&self, panic: bool) {
        self.panic_on_call.store(panic, Ordering::SeqCst);
    }

    /// Delay every call by `latency` before it touches the tables.
    pub fn set_latency(&self, latency: Duration) {
        let ms = usize::try_from(latency.as_millis()).unwrap_or(usize::MAX);
        self.latency_ms.store(ms, Ordering::SeqCst);
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            users: self.user_calls.load(Ordering::SeqCst),
            cart_items: self.cart_item_calls.load(Ordering::SeqCst),
            images: self.image_calls.load(Ordering::SeqCst),
        }
    }

    /// Insert a user directly, bypassing counters and uniqueness checks.
    pub fn seed_user(&self, user: User) {
        self.tables().users.push(user);
    }

    /// Insert a cart item directly, bypassing counters.
    pub fn seed_cart_item(&self, item: CartItem) {
        self.tables().cart_items.push(item);
    }

    /// Snapshot of every user row, soft-deleted ones included.
    pub fn users(&self) -> Vec<User> {
        self.tables().users.clone()
    }

    /// Snapshot of every cart item row, soft-deleted ones included.
    pub fn cart_items(&self) -> Vec<CartItem> {
        self.tables().cart_items.clone()
    }

    /// Snapshot of every image row.
    pub fn images(&self) -> Vec<CartItemImage> {
        self.tables().images.clone()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count the call and apply the configured failure knobs.
    async fn enter(&self, table: Table) -> Result<(), StoreError> {
        let counter = match table {
            Table::Users => &self.user_calls,
            Table::CartItems => &self.cart_item_calls,
            Table::Images => &self.image_calls,
        };
        counter.fetch_add(1, Ordering::SeqCst);

        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency as u64)).await;
        }
        if self.panic_on_call.load(Ordering::SeqCst) {
            panic!("memory store configured to panic");
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }

    fn rejecting_writes(&self) -> bool {
        self.reject_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &User) -> Result<Option<User>, StoreError> {
        self.enter(Table::Users).await?;
        if self.rejecting_writes() {
            return Ok(None);
        }
        let mut tables = self.tables();
        let conflict = tables.users.iter().any(|u| {
            u.id == user.id
                || u.username == user.username
                || u.auth_provider_id == user.auth_provider_id
        });
        if conflict {
            return Ok(None);
        }
        tables.users.push(user.clone());
        Ok(Some(user.clone()))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        self.enter(Table::Users).await?;
        Ok(live_user(&self.tables(), |u| u.id == id))
    }

    async fn find_by_auth_provider_id(
        &self,
        auth_provider_id: &str,
    ) -> Result<Option<User>, StoreError> {
        self.enter(Table::Users).await?;
        Ok(live_user(&self.tables(), |u| {
            u.auth_provider_id == auth_provider_id
        }))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.enter(Table::Users).await?;
        Ok(live_user(&self.tables(), |u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.enter(Table::Users).await?;
        Ok(live_user(&self.tables(), |u| u.email == email))
    }

    async fn update_auth_provider_id(
        &self,
        id: DbId,
        auth_provider_id: &str,
        updated_at: Timestamp,
    ) -> Result<Option<User>, StoreError> {
        self.enter(Table::Users).await?;
        if self.rejecting_writes() {
            return Ok(None);
        }
        let mut tables = self.tables();
        let taken = tables
            .users
            .iter()
            .any(|u| u.id != id && u.auth_provider_id == auth_provider_id);
        if taken {
            return Err(StoreError::Conflict {
                constraint: "uq_users_auth_provider_id".to_string(),
            });
        }
        Ok(tables
            .users
            .iter_mut()
            .find(|u| u.id == id && !u.is_deleted)
            .map(|u| {
                u.auth_provider_id = auth_provider_id.to_string();
                u.updated_at = updated_at;
                u.clone()
            }))
    }
}

fn live_user(tables: &Tables, pred: impl Fn(&User) -> bool) -> Option<User> {
    tables
        .users
        .iter()
        .find(|u| !u.is_deleted && pred(u))
        .cloned()
}

#[async_trait]
impl CartItemStore for MemoryStore {
    async fn create(&self, item: &CartItem) -> Result<Option<CartItem>, StoreError> {
        self.enter(Table::CartItems).await?;
        if self.rejecting_writes() {
            return Ok(None);
        }
        let mut tables = self.tables();
        if tables.cart_items.iter().any(|i| i.id == item.id) {
            return Ok(None);
        }
        tables.cart_items.push(item.clone());
        Ok(Some(item.clone()))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<CartItem>, StoreError> {
        self.enter(Table::CartItems).await?;
        Ok(self
            .tables()
            .cart_items
            .iter()
            .find(|i| i.id == id && !i.is_deleted)
            .cloned())
    }

    async fn find_owned(&self, id: DbId, user_id: DbId) -> Result<Option<CartItem>, StoreError> {
        self.enter(Table::CartItems).await?;
        Ok(self
            .tables()
            .cart_items
            .iter()
            .find(|i| i.id == id && i.user_id == user_id && !i.is_deleted)
            .cloned())
    }

    async fn update(&self, item: &CartItem) -> Result<Option<CartItem>, StoreError> {
        self.enter(Table::CartItems).await?;
        if self.rejecting_writes() {
            return Ok(None);
        }
        Ok(self
            .tables()
            .cart_items
            .iter_mut()
            .find(|i| i.id == item.id && i.user_id == item.user_id && !i.is_deleted)
            .map(|existing| {
                existing.name = item.name.clone();
                existing.description = item.description.clone();
                existing.price = item.price;
                existing.quantity = item.quantity;
                existing.updated_at = item.updated_at;
                existing.clone()
            }))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        self.enter(Table::CartItems).await?;
        let mut tables = self.tables();
        let before = tables.cart_items.len();
        tables.cart_items.retain(|i| i.id != id);
        let removed = tables.cart_items.len() < before;
        if removed {
            tables.images.retain(|img| img.cart_item_id != id);
        }
        Ok(removed)
    }

    async fn list_for_user(
        &self,
        user_id: DbId,
        request: PageRequest,
    ) -> Result<Page<CartItem>, StoreError> {
        self.enter(Table::CartItems).await?;
        let mut owned: Vec<CartItem> = self
            .tables()
            .cart_items
            .iter()
            .filter(|i| i.user_id == user_id && !i.is_deleted)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let total_count = owned.len() as i64;
        let data = owned
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Ok(Page::new(data, request, total_count))
    }
}

#[async_trait]
impl CartItemImageStore for MemoryStore {
    async fn create(&self, image: &CartItemImage) -> Result<Option<CartItemImage>, StoreError> {
        self.enter(Table::Images).await?;
        if self.rejecting_writes() {
            return Ok(None);
        }
        let mut tables = self.tables();
        let parent_exists = tables.cart_items.iter().any(|i| i.id == image.cart_item_id);
        if !parent_exists || tables.images.iter().any(|i| i.id == image.id) {
            return Ok(None);
        }
        tables.images.push(image.clone());
        Ok(Some(image.clone()))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<CartItemImage>, StoreError> {
        self.enter(Table::Images).await?;
        Ok(self
            .tables()
            .images
            .iter()
            .find(|i| i.id == id && !i.is_deleted)
            .cloned())
    }

    async fn list_for_cart_item(
        &self,
        cart_item_id: DbId,
    ) -> Result<Vec<CartItemImage>, StoreError> {
        self.enter(Table::Images).await?;
        Ok(self
            .tables()
            .images
            .iter()
            .filter(|i| i.cart_item_id == cart_item_id && !i.is_deleted)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}
