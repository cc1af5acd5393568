use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::AdminError;
use crate::actor_framework::{Entity, ResourceClient};
use crate::api::{ApiError, StoreApi};
use crate::domain::{DeliveryDraft, DeliveryState, DeliveryStatus, OrderStatus, OrderSummary, Product, ProductDraft, User};

/// What a save produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Saved<R> {
    /// The stored record; the screen splices it into its list.
    Record(R),
    /// The backend echoes nothing useful; the screen reloads the list.
    Refetch,
}

/// Storage behind one admin screen.
#[async_trait]
pub trait AdminBackend<R>: Send + Sync
where
    R: Clone + Send + Sync + 'static,
{
    type Draft: Clone + Debug + Default + Send + Sync + 'static;

    fn kind(&self) -> &'static str;
    fn id_of<'a>(&self, record: &'a R) -> &'a str;
    fn draft_of(&self, record: &R) -> Self::Draft;

    async fn list(&self) -> Result<Vec<R>, AdminError>;
    async fn create(&self, draft: Self::Draft) -> Result<Saved<R>, AdminError>;
    async fn update(&self, id: &str, draft: Self::Draft) -> Result<Saved<R>, AdminError>;

    async fn delete(&self, _id: &str) -> Result<(), AdminError> {
        Err(AdminError::DeleteUnsupported(self.kind()))
    }
}

// =============================================================================
// REMOTE BACKENDS
// =============================================================================

pub struct RemoteProducts {
    api: Arc<dyn StoreApi>,
}

impl RemoteProducts {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AdminBackend<Product> for RemoteProducts {
    type Draft = ProductDraft;

    fn kind(&self) -> &'static str {
        "Product"
    }

    fn id_of<'a>(&self, record: &'a Product) -> &'a str {
        &record.id
    }

    fn draft_of(&self, record: &Product) -> ProductDraft {
        ProductDraft::from(record)
    }

    async fn list(&self) -> Result<Vec<Product>, AdminError> {
        Ok(self.api.list_products().await?)
    }

    async fn create(&self, draft: ProductDraft) -> Result<Saved<Product>, AdminError> {
        self.api.create_product(draft).await?;
        Ok(Saved::Refetch)
    }

    async fn update(&self, id: &str, draft: ProductDraft) -> Result<Saved<Product>, AdminError> {
        self.api.update_product(id.to_string(), draft).await?;
        Ok(Saved::Refetch)
    }
}

/// Orders are created by customers; the admin only moves them between
/// statuses.
pub struct RemoteOrders {
    api: Arc<dyn StoreApi>,
}

impl RemoteOrders {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AdminBackend<OrderSummary> for RemoteOrders {
    type Draft = OrderStatus;

    fn kind(&self) -> &'static str {
        "Order"
    }

    fn id_of<'a>(&self, record: &'a OrderSummary) -> &'a str {
        &record.order_id
    }

    fn draft_of(&self, record: &OrderSummary) -> OrderStatus {
        record.order_status
    }

    async fn list(&self) -> Result<Vec<OrderSummary>, AdminError> {
        Ok(self.api.list_order_summaries().await?)
    }

    async fn create(&self, _draft: OrderStatus) -> Result<Saved<OrderSummary>, AdminError> {
        Err(AdminError::CreateUnsupported(self.kind()))
    }

    async fn update(&self, id: &str, status: OrderStatus) -> Result<Saved<OrderSummary>, AdminError> {
        self.api.update_order_status(id.to_string(), status).await?;
        Ok(Saved::Refetch)
    }
}

// =============================================================================
// LOCAL BACKEND
// =============================================================================

/// Initial records for a local collection, loaded on first mount.
#[async_trait]
pub trait SeedSource<T>: Send + Sync {
    async fn records(&self) -> Result<Vec<T>, ApiError>;
}

pub struct FixedSeed<T>(pub Vec<T>);

#[async_trait]
impl<T: Clone + Send + Sync> SeedSource<T> for FixedSeed<T> {
    async fn records(&self) -> Result<Vec<T>, ApiError> {
        Ok(self.0.clone())
    }
}

/// Seeds the user collection from `GET /identity/users`.
pub struct RemoteUsers {
    api: Arc<dyn StoreApi>,
}

impl RemoteUsers {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SeedSource<User> for RemoteUsers {
    async fn records(&self) -> Result<Vec<User>, ApiError> {
        self.api.list_users().await
    }
}

/// Collection kept in a [`ResourceActor`](crate::actor_framework::ResourceActor);
/// saves land immediately. Clones share the collection and its seed state.
#[derive(Clone)]
pub struct LocalBackend<T: Entity> {
    store: ResourceClient<T>,
    seed: Option<Arc<dyn SeedSource<T>>>,
    seeded: Arc<AtomicBool>,
}

impl<T: Entity> LocalBackend<T> {
    pub fn new(store: ResourceClient<T>) -> Self {
        Self {
            store,
            seed: None,
            seeded: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_seed(mut self, seed: impl SeedSource<T> + 'static) -> Self {
        self.seed = Some(Arc::new(seed));
        self
    }

    async fn ensure_seeded(&self) -> Result<(), AdminError> {
        let Some(seed) = &self.seed else {
            return Ok(());
        };
        if self.seeded.load(Ordering::Acquire) {
            return Ok(());
        }
        match seed.records().await {
            Ok(records) => {
                let count = self.store.seed(records).await?;
                self.seeded.store(true, Ordering::Release);
                info!(kind = T::KIND, count, "Local collection seeded");
            }
            // Retried on the next mount.
            Err(e) => warn!(kind = T::KIND, error = %e, "Could not seed local collection"),
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> AdminBackend<T> for LocalBackend<T> {
    type Draft = T::Draft;

    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn id_of<'a>(&self, record: &'a T) -> &'a str {
        record.id()
    }

    fn draft_of(&self, record: &T) -> T::Draft {
        record.to_draft()
    }

    async fn list(&self) -> Result<Vec<T>, AdminError> {
        self.ensure_seeded().await?;
        Ok(self.store.list().await?)
    }

    async fn create(&self, draft: T::Draft) -> Result<Saved<T>, AdminError> {
        Ok(Saved::Record(self.store.create(draft).await?))
    }

    async fn update(&self, id: &str, draft: T::Draft) -> Result<Saved<T>, AdminError> {
        Ok(Saved::Record(self.store.update(id.to_string(), draft).await?))
    }

    async fn delete(&self, id: &str) -> Result<(), AdminError> {
        Ok(self.store.delete(id.to_string()).await?)
    }
}

/// Shipments shown before any tracking data exists.
pub fn sample_deliveries() -> Vec<DeliveryStatus> {
    let record = |id: &str, order_id, status, tracking: &str, shipped: &str, delivered: &str, position: &str, address: &str| {
        DeliveryStatus::from_draft(
            id,
            DeliveryDraft {
                order_id,
                tracking_number: tracking.to_string(),
                status,
                shipping_date: shipped.to_string(),
                delivery_date: delivered.to_string(),
                current_position: position.to_string(),
                address: address.to_string(),
            },
        )
    };
    vec![
        record(
            "track-001",
            101,
            DeliveryState::Delivered,
            "VN123456789",
            "2024-07-21",
            "2024-07-23",
            "Đã giao",
            "123 Đường ABC, Quận 1, TP.HCM",
        ),
        record(
            "track-002",
            102,
            DeliveryState::InTransit,
            "VN987654321",
            "2024-07-22",
            "2024-07-25",
            "Kho Hà Nội",
            "456 Đường XYZ, Hoàn Kiếm, Hà Nội",
        ),
        record(
            "track-003",
            103,
            DeliveryState::Processing,
            "",
            "",
            "",
            "Đang xử lý tại kho",
            "789 Đường DEF, Sơn Trà, Đà Nẵng",
        ),
    ]
}
