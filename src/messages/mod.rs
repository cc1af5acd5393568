use tokio::sync::oneshot;

use crate::cart::{CartAdjustment, CartError, CartSnapshot};
use crate::domain::{CartLine, Notification, Product};
use crate::notifications::FeedError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed message enums for service communication. Each variant includes its
/// parameters and a oneshot channel for the response.

#[derive(Debug)]
pub enum CartRequest {
    Add {
        product: Product,
        respond_to: ServiceResponse<CartSnapshot, CartError>,
    },
    Remove {
        product_id: String,
        respond_to: ServiceResponse<CartSnapshot, CartError>,
    },
    Clear {
        respond_to: ServiceResponse<CartSnapshot, CartError>,
    },
    Snapshot {
        respond_to: ServiceResponse<CartSnapshot, CartError>,
    },
    Restore {
        lines: Vec<CartLine>,
        respond_to: ServiceResponse<CartSnapshot, CartError>,
    },
    Reconcile {
        products: Vec<Product>,
        respond_to: ServiceResponse<Vec<CartAdjustment>, CartError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum FeedRequest {
    List {
        respond_to: ServiceResponse<Vec<Notification>, FeedError>,
    },
    UnreadCount {
        respond_to: ServiceResponse<usize, FeedError>,
    },
    MarkAllRead {
        respond_to: ServiceResponse<usize, FeedError>,
    },
    Shutdown,
}
