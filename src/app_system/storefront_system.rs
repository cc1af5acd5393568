use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::actors::{CartService, NotificationFeedService};
use crate::admin::{
    sample_deliveries, AdminScreen, DeliveryScreen, FixedSeed, LocalBackend, OrderScreen, ProductScreen,
    RemoteOrders, RemoteProducts, RemoteUsers, UserScreen,
};
use crate::api::{HttpStoreApi, StoreApi};
use crate::catalog::Catalog;
use crate::checkout::Checkout;
use crate::clients::{CartClient, NotificationFeedClient};
use crate::config::StorefrontConfig;
use crate::domain::{DeliveryStatus, PaymentContext, User};
use crate::error::{Result, StorefrontError};
use crate::orders::OrderHistory;
use crate::payment::{PaymentError, PaymentFlow};
use crate::session::SessionManager;
use crate::storage::{CartMirror, JsonFileStore, KeyValueStore};

/// The running storefront: backend access, persisted stores and the
/// long-running services, plus factories for each view.
pub struct StorefrontSystem {
    pub config: StorefrontConfig,
    pub api: Arc<dyn StoreApi>,
    /// Survives restarts: credentials and the cart mirror.
    pub local_store: Arc<dyn KeyValueStore>,
    /// Pending payment context.
    pub session_store: Arc<dyn KeyValueStore>,
    pub session: SessionManager,
    pub cart: CartClient,
    users: LocalBackend<User>,
    deliveries: LocalBackend<DeliveryStatus>,
    feeds: Vec<NotificationFeedClient>,
    handles: Vec<JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Opens the file-backed stores under the configured data directory and
    /// connects to the configured backend.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let api: Arc<dyn StoreApi> = Arc::new(HttpStoreApi::from_config(&config)?);
        let local_store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(config.local_store_path())?);
        let session_store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(config.session_store_path())?);
        Ok(Self::with_parts(config, api, local_store, session_store))
    }

    pub fn with_parts(
        config: StorefrontConfig,
        api: Arc<dyn StoreApi>,
        local_store: Arc<dyn KeyValueStore>,
        session_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let buffer = config.channel_buffer;

        // 1. Cart service, restored from the mirror
        let (cart_service, cart) = CartService::new(buffer, CartMirror::new(local_store.clone()));
        let cart_handle = tokio::spawn(cart_service.run());

        // 2. Local collections for the admin screens
        let (user_actor, user_store) = ResourceActor::<User>::new(buffer, id_sequence(""));
        let user_handle = tokio::spawn(user_actor.run());
        let users = LocalBackend::new(user_store).with_seed(RemoteUsers::new(api.clone()));

        let (delivery_actor, delivery_store) = ResourceActor::<DeliveryStatus>::new(buffer, id_sequence("track-"));
        let delivery_handle = tokio::spawn(delivery_actor.run());
        let deliveries = LocalBackend::new(delivery_store).with_seed(FixedSeed(sample_deliveries()));

        let session = SessionManager::new(api.clone(), local_store.clone());

        info!(api = %config.api_base_url, "Storefront system started");
        Self {
            config,
            api,
            local_store,
            session_store,
            session,
            cart,
            users,
            deliveries,
            feeds: Vec::new(),
            handles: vec![cart_handle, user_handle, delivery_handle],
        }
    }

    pub async fn catalog(&self) -> Result<Catalog> {
        Ok(Catalog::load(&self.api).await?)
    }

    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.api.clone(), self.cart.clone(), self.config.default_address.clone())
    }

    pub fn payment(&self, nav_state: Option<PaymentContext>) -> std::result::Result<PaymentFlow, PaymentError> {
        PaymentFlow::enter(self.api.clone(), self.session_store.clone(), self.cart.clone(), nav_state)
    }

    pub fn order_history(&self, user_id: impl Into<String>) -> OrderHistory {
        OrderHistory::new(self.api.clone(), user_id)
    }

    /// Starts a notification feed for `user_id`. It is torn down on shutdown.
    pub fn notification_feed(&mut self, user_id: impl Into<String>) -> NotificationFeedClient {
        let (service, feed) = NotificationFeedService::new(
            self.config.channel_buffer,
            self.api.clone(),
            user_id,
            self.config.reconnect,
        );
        self.handles.push(tokio::spawn(service.run()));
        self.feeds.push(feed.clone());
        feed
    }

    pub fn product_screen(&self) -> ProductScreen {
        AdminScreen::new(RemoteProducts::new(self.api.clone()))
    }

    pub fn order_screen(&self) -> OrderScreen {
        AdminScreen::new(RemoteOrders::new(self.api.clone()))
    }

    pub fn user_screen(&self) -> UserScreen {
        AdminScreen::new(self.users.clone())
    }

    pub fn delivery_screen(&self) -> DeliveryScreen {
        AdminScreen::new(self.deliveries.clone())
    }

    pub async fn shutdown(self) -> Result<()> {
        info!("Shutting down storefront...");
        self.cart.shutdown().await;
        for feed in &self.feeds {
            feed.shutdown().await;
        }

        // Local collections stop once their last client is gone.
        drop(self.users);
        drop(self.deliveries);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Service task failed");
                return Err(StorefrontError::TaskFailed(e.to_string()));
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}

/// Ids for locally created records: a millisecond timestamp, bumped on every
/// call so records created in the same millisecond stay distinct.
fn id_sequence(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let next = Arc::new(AtomicU64::new(Utc::now().timestamp_millis().max(0) as u64));
    move || format!("{}{}", prefix, next.fetch_add(1, Ordering::SeqCst))
}
