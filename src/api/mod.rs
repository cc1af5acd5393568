//! Remote backend access.
//!
//! [`StoreApi`] is the seam between the client workflows and the backend:
//! production code uses [`HttpStoreApi`], tests script replies through the
//! mock in `mock_framework`.

mod envelope;
mod error;
mod http;

pub use envelope::*;
pub use error::*;
pub use http::*;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Notification, OrderRequest, OrderResult, OrderStatus, OrderSummary, PaymentRecord, Product,
    ProductDraft, User,
};

/// Raw body of the notification event stream.
pub type ByteStream = BoxStream<'static, Result<Bytes, ApiError>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub token: String,
    #[serde(default)]
    pub expiry_time: Option<String>,
}

/// One method per backend endpoint. Nothing is retried.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Sets or clears the bearer token sent with every later call.
    fn set_bearer_token(&self, token: Option<String>);

    async fn login(&self, credentials: Credentials) -> Result<AuthToken, ApiError>;

    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
    async fn create_product(&self, draft: ProductDraft) -> Result<(), ApiError>;
    async fn update_product(&self, id: String, draft: ProductDraft) -> Result<(), ApiError>;

    async fn create_order(&self, order: OrderRequest) -> Result<OrderResult, ApiError>;
    async fn update_order_status(&self, id: String, status: OrderStatus) -> Result<(), ApiError>;
    async fn cancel_order(&self, id: String) -> Result<(), ApiError>;

    async fn create_payment(&self, record: PaymentRecord) -> Result<(), ApiError>;

    async fn list_order_summaries(&self) -> Result<Vec<OrderSummary>, ApiError>;
    async fn list_user_orders(&self, user_id: String) -> Result<Vec<OrderSummary>, ApiError>;

    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn get_user(&self, id: String) -> Result<User, ApiError>;

    async fn list_notifications(&self, user_id: String) -> Result<Vec<Notification>, ApiError>;
    async fn mark_notifications_read(&self, user_id: String) -> Result<(), ApiError>;
    async fn open_notification_stream(&self, user_id: String) -> Result<ByteStream, ApiError>;
}
