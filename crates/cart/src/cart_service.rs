//! Cart item lifecycle: list, get, add, update, remove, attach image.
//!
//! Every operation takes the caller's resolved user id and only ever
//! touches cart items that user owns. Validation runs before any store call.

use std::sync::Arc;

use chrono::Utc;
use opencart_core::dto::{CartItemDto, CartItemImageDto};
use opencart_core::error::CoreError;
use opencart_core::pagination::{Page, PageRequest};
use opencart_core::types::DbId;
use opencart_core::validation::{validate_cart_item, validate_cart_item_image};
use opencart_db::models::cart_item::CartItem;
use opencart_db::models::cart_item_image::CartItemImage;
use opencart_db::models::user::User;
use opencart_db::store::{CartItemImageStore, CartItemStore, UserStore};
use tokio_util::sync::CancellationToken;

use crate::boundary::{guarded, store_failure};
use crate::ServiceResult;

#[derive(Clone)]
pub struct CartService {
    users: Arc<dyn UserStore>,
    cart_items: Arc<dyn CartItemStore>,
    images: Arc<dyn CartItemImageStore>,
}

impl CartService {
    pub fn new(
        users: Arc<dyn UserStore>,
        cart_items: Arc<dyn CartItemStore>,
        images: Arc<dyn CartItemImageStore>,
    ) -> Self {
        Self {
            users,
            cart_items,
            images,
        }
    }

    /// One page of the user's cart items. An empty cart is an empty page.
    pub async fn list_cart_items(
        &self,
        user_id: &str,
        request: PageRequest,
        cancel: &CancellationToken,
    ) -> ServiceResult<Page<CartItemDto>> {
        const OP: &str = "list_cart_items";
        tracing::info!(
            user_id,
            page = request.page,
            page_size = request.page_size,
            "Listing cart items"
        );

        guarded(OP, user_id, cancel, async {
            if user_id.trim().is_empty() {
                tracing::warn!("Listing cart items without a user");
                return Err(CoreError::UserNotFound);
            }
            let user = self.require_user(OP, user_id).await?;
            let page = self
                .cart_items
                .list_for_user(user.id, request)
                .await
                .map_err(|e| store_failure(OP, user_id, e))?;
            tracing::debug!(user_id, total_count = page.total_count, "Cart items listed");
            Ok(page.map(CartItemDto::from))
        })
        .await
    }

    pub async fn get_cart_item(
        &self,
        user_id: &str,
        cart_item_id: DbId,
        cancel: &CancellationToken,
    ) -> ServiceResult<CartItemDto> {
        const OP: &str = "get_cart_item";
        tracing::info!(user_id, %cart_item_id, "Fetching cart item");

        guarded(OP, user_id, cancel, async {
            require_user_id(user_id)?;
            require_cart_item_id(cart_item_id)?;
            let user = self.require_user(OP, user_id).await?;
            let item = self.require_owned(OP, user_id, cart_item_id, user.id).await?;
            Ok(item.into())
        })
        .await
    }

    /// Create a cart item owned by the caller.
    ///
    /// The payload's `id` is ignored; the item gets a fresh id and both
    /// timestamps set to now.
    pub async fn add_cart_item(
        &self,
        user_id: &str,
        payload: CartItemDto,
        cancel: &CancellationToken,
    ) -> ServiceResult<CartItemDto> {
        const OP: &str = "add_cart_item";
        tracing::info!(user_id, name = %payload.name, "Adding cart item");

        guarded(OP, user_id, cancel, async {
            require_user_id(user_id)?;
            check(user_id, validate_cart_item(&payload))?;
            let user = self.require_user(OP, user_id).await?;

            let item = CartItem::new(user.id, &payload, Utc::now());
            let created = self
                .cart_items
                .create(&item)
                .await
                .map_err(|e| store_failure(OP, user_id, e))?
                .ok_or_else(|| {
                    tracing::warn!(user_id, cart_item_id = %item.id, "Cart item insert returned no row");
                    CoreError::PersistenceFailed("Failed to add cart item.".to_string())
                })?;

            tracing::info!(user_id, cart_item_id = %created.id, "Cart item added");
            Ok(created.into())
        })
        .await
    }

    /// Overwrite name, description, price and quantity of an owned item.
    pub async fn update_cart_item(
        &self,
        user_id: &str,
        cart_item_id: DbId,
        payload: CartItemDto,
        cancel: &CancellationToken,
    ) -> ServiceResult<CartItemDto> {
        const OP: &str = "update_cart_item";
        tracing::info!(user_id, %cart_item_id, "Updating cart item");

        guarded(OP, user_id, cancel, async {
            require_user_id(user_id)?;
            require_cart_item_id(cart_item_id)?;
            check(user_id, validate_cart_item(&payload))?;
            let user = self.require_user(OP, user_id).await?;
            let mut item = self.require_owned(OP, user_id, cart_item_id, user.id).await?;

            item.apply(&payload, Utc::now());
            let updated = self
                .cart_items
                .update(&item)
                .await
                .map_err(|e| store_failure(OP, user_id, e))?
                .ok_or_else(|| {
                    tracing::warn!(user_id, %cart_item_id, "Cart item update returned no row");
                    CoreError::PersistenceFailed("Failed to update cart item.".to_string())
                })?;

            tracing::info!(user_id, %cart_item_id, "Cart item updated");
            Ok(updated.into())
        })
        .await
    }

    /// Delete an owned item and its images. Returns whether a row was
    /// removed.
    pub async fn remove_cart_item(
        &self,
        user_id: &str,
        cart_item_id: DbId,
        cancel: &CancellationToken,
    ) -> ServiceResult<bool> {
        const OP: &str = "remove_cart_item";
        tracing::info!(user_id, %cart_item_id, "Removing cart item");

        guarded(OP, user_id, cancel, async {
            require_user_id(user_id)?;
            require_cart_item_id(cart_item_id)?;
            let user = self.require_user(OP, user_id).await?;
            let item = self.require_owned(OP, user_id, cart_item_id, user.id).await?;

            let removed = self
                .cart_items
                .delete(item.id)
                .await
                .map_err(|e| store_failure(OP, user_id, e))?;

            tracing::info!(user_id, %cart_item_id, removed, "Cart item removed");
            Ok(removed)
        })
        .await
    }

    /// Attach an image to an owned cart item.
    pub async fn add_image_to_cart_item(
        &self,
        user_id: &str,
        cart_item_id: DbId,
        image: CartItemImageDto,
        cancel: &CancellationToken,
    ) -> ServiceResult<CartItemImageDto> {
        const OP: &str = "add_image_to_cart_item";
        tracing::info!(
            user_id,
            %cart_item_id,
            file_name = image.file_name.as_deref().unwrap_or_default(),
            "Adding image to cart item"
        );

        guarded(OP, user_id, cancel, async {
            require_user_id(user_id)?;
            require_cart_item_id(cart_item_id)?;
            check(user_id, validate_cart_item_image(&image))?;
            let user = self.require_user(OP, user_id).await?;
            let item = self.require_owned(OP, user_id, cart_item_id, user.id).await?;

            let new_image = CartItemImage::new(item.id, image, Utc::now());
            let created = self
                .images
                .create(&new_image)
                .await
                .map_err(|e| store_failure(OP, user_id, e))?
                .ok_or_else(|| {
                    tracing::warn!(user_id, %cart_item_id, "Image insert returned no row");
                    CoreError::PersistenceFailed("Failed to add image to cart item.".to_string())
                })?;

            tracing::info!(user_id, %cart_item_id, image_id = %created.id, "Image added");
            Ok(created.into())
        })
        .await
    }

    async fn require_user(&self, operation: &'static str, user_id: &str) -> ServiceResult<User> {
        self.users
            .find_by_auth_provider_id(user_id)
            .await
            .map_err(|e| store_failure(operation, user_id, e))?
            .ok_or_else(|| {
                tracing::warn!(operation, user_id, "User not found");
                CoreError::UserNotFound
            })
    }

    async fn require_owned(
        &self,
        operation: &'static str,
        user_id: &str,
        cart_item_id: DbId,
        owner: DbId,
    ) -> ServiceResult<CartItem> {
        self.cart_items
            .find_owned(cart_item_id, owner)
            .await
            .map_err(|e| store_failure(operation, user_id, e))?
            .ok_or_else(|| {
                tracing::warn!(operation, user_id, %cart_item_id, "Cart item not found");
                CoreError::CartItemNotFound { id: cart_item_id }
            })
    }
}

fn require_user_id(user_id: &str) -> ServiceResult<()> {
    if user_id.trim().is_empty() {
        return Err(CoreError::InvalidArgument("User id is required.".to_string()));
    }
    Ok(())
}

fn require_cart_item_id(cart_item_id: DbId) -> ServiceResult<()> {
    if cart_item_id.is_nil() {
        return Err(CoreError::InvalidArgument(
            "Cart item id is required.".to_string(),
        ));
    }
    Ok(())
}

fn check(user_id: &str, violations: Vec<String>) -> ServiceResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    tracing::warn!(user_id, ?violations, "Payload failed validation");
    Err(CoreError::ValidationFailed(violations))
}
