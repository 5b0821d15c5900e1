use std::sync::Arc;

use opencart_cart::{CartService, UserService};
use opencart_db::store::{CartItemImageStore, CartItemStore, StoreHealth, UserStore};
use tokio_util::sync::CancellationToken;

use crate::auth::github::IdentityProvider;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub cart: CartService,
    pub users: UserService,
    /// OAuth provider used by the login and callback handlers.
    pub identity_provider: Arc<dyn IdentityProvider>,
    /// Store liveness, reported by `/health`.
    pub store_health: Arc<dyn StoreHealth>,
    pub config: Arc<ServerConfig>,
    /// Cancelled on shutdown; handlers pass a child token to the services.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire both services to one store implementing every store trait.
    pub fn new<S>(
        store: Arc<S>,
        identity_provider: Arc<dyn IdentityProvider>,
        config: Arc<ServerConfig>,
        shutdown: CancellationToken,
    ) -> Self
    where
        S: UserStore + CartItemStore + CartItemImageStore + StoreHealth + 'static,
    {
        Self {
            cart: CartService::new(store.clone(), store.clone(), store.clone()),
            users: UserService::new(store.clone()),
            identity_provider,
            store_health: store,
            config,
            shutdown,
        }
    }

    /// Token for one request's service calls.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
