//! # Mock Framework
//!
//! Utilities for testing workflows without a backend.
//!
//! Use [`create_mock_api`] to get a [`StoreApi`] and a receiver. Every API
//! call arrives on the receiver as an [`ApiCall`] carrying a oneshot
//! responder, so a test can assert on the request and script the reply
//! (success, failure, or never answering).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot};

use crate::api::{ApiError, AuthToken, ByteStream, Credentials, StoreApi};
use crate::domain::{
    Notification, OrderRequest, OrderResult, OrderStatus, OrderSummary, PaymentRecord, Product,
    ProductDraft, User,
};

pub type Responder<T> = oneshot::Sender<Result<T, ApiError>>;

/// One intercepted backend call.
pub enum ApiCall {
    Login { credentials: Credentials, respond_to: Responder<AuthToken> },
    ListProducts { respond_to: Responder<Vec<Product>> },
    CreateProduct { draft: ProductDraft, respond_to: Responder<()> },
    UpdateProduct { id: String, draft: ProductDraft, respond_to: Responder<()> },
    CreateOrder { order: OrderRequest, respond_to: Responder<OrderResult> },
    UpdateOrderStatus { id: String, status: OrderStatus, respond_to: Responder<()> },
    CancelOrder { id: String, respond_to: Responder<()> },
    CreatePayment { record: PaymentRecord, respond_to: Responder<()> },
    ListOrderSummaries { respond_to: Responder<Vec<OrderSummary>> },
    ListUserOrders { user_id: String, respond_to: Responder<Vec<OrderSummary>> },
    ListUsers { respond_to: Responder<Vec<User>> },
    GetUser { id: String, respond_to: Responder<User> },
    ListNotifications { user_id: String, respond_to: Responder<Vec<Notification>> },
    MarkNotificationsRead { user_id: String, respond_to: Responder<()> },
    OpenNotificationStream { user_id: String, respond_to: Responder<ByteStream> },
}

impl ApiCall {
    pub fn name(&self) -> &'static str {
        match self {
            ApiCall::Login { .. } => "login",
            ApiCall::ListProducts { .. } => "list_products",
            ApiCall::CreateProduct { .. } => "create_product",
            ApiCall::UpdateProduct { .. } => "update_product",
            ApiCall::CreateOrder { .. } => "create_order",
            ApiCall::UpdateOrderStatus { .. } => "update_order_status",
            ApiCall::CancelOrder { .. } => "cancel_order",
            ApiCall::CreatePayment { .. } => "create_payment",
            ApiCall::ListOrderSummaries { .. } => "list_order_summaries",
            ApiCall::ListUserOrders { .. } => "list_user_orders",
            ApiCall::ListUsers { .. } => "list_users",
            ApiCall::GetUser { .. } => "get_user",
            ApiCall::ListNotifications { .. } => "list_notifications",
            ApiCall::MarkNotificationsRead { .. } => "mark_notifications_read",
            ApiCall::OpenNotificationStream { .. } => "open_notification_stream",
        }
    }
}

/// A [`StoreApi`] that forwards every call to a test-controlled channel.
pub struct MockStoreApi {
    sender: mpsc::Sender<ApiCall>,
    token: Mutex<Option<String>>,
}

impl MockStoreApi {
    pub fn bearer_token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|token| token.clone())
    }

    async fn call<T>(&self, build: impl FnOnce(Responder<T>) -> ApiCall) -> Result<T, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ApiError::Transport("mock backend closed".to_string()))?;
        response
            .await
            .map_err(|_| ApiError::Transport("mock backend dropped the request".to_string()))?
    }
}

/// Creates a mock API and the receiver its calls arrive on.
pub fn create_mock_api() -> (Arc<MockStoreApi>, mpsc::Receiver<ApiCall>) {
    let (sender, receiver) = mpsc::channel(32);
    let api = MockStoreApi {
        sender,
        token: Mutex::new(None),
    };
    (Arc::new(api), receiver)
}

/// Waits for the next call. Panics when the API was dropped.
pub async fn expect_call(receiver: &mut mpsc::Receiver<ApiCall>) -> ApiCall {
    receiver.recv().await.expect("Expected an API call")
}

/// Answers every call with `handler` on a background task.
pub fn spawn_responder<F>(mut receiver: mpsc::Receiver<ApiCall>, mut handler: F) -> tokio::task::JoinHandle<()>
where
    F: FnMut(ApiCall) + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(call) = receiver.recv().await {
            handler(call);
        }
    })
}

/// A byte stream fed through the returned sender; dropping the sender ends it.
pub fn byte_stream_channel() -> (mpsc::Sender<Result<Bytes, ApiError>>, ByteStream) {
    let (sender, receiver) = mpsc::channel(16);
    let stream = stream::unfold(receiver, |mut receiver| async move {
        receiver.recv().await.map(|item| (item, receiver))
    })
    .boxed();
    (sender, stream)
}

#[async_trait]
impl StoreApi for MockStoreApi {
    fn set_bearer_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = token;
        }
    }

    async fn login(&self, credentials: Credentials) -> Result<AuthToken, ApiError> {
        self.call(|respond_to| ApiCall::Login { credentials, respond_to }).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.call(|respond_to| ApiCall::ListProducts { respond_to }).await
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<(), ApiError> {
        self.call(|respond_to| ApiCall::CreateProduct { draft, respond_to }).await
    }

    async fn update_product(&self, id: String, draft: ProductDraft) -> Result<(), ApiError> {
        self.call(|respond_to| ApiCall::UpdateProduct { id, draft, respond_to }).await
    }

    async fn create_order(&self, order: OrderRequest) -> Result<OrderResult, ApiError> {
        self.call(|respond_to| ApiCall::CreateOrder { order, respond_to }).await
    }

    async fn update_order_status(&self, id: String, status: OrderStatus) -> Result<(), ApiError> {
        self.call(|respond_to| ApiCall::UpdateOrderStatus { id, status, respond_to }).await
    }

    async fn cancel_order(&self, id: String) -> Result<(), ApiError> {
        self.call(|respond_to| ApiCall::CancelOrder { id, respond_to }).await
    }

    async fn create_payment(&self, record: PaymentRecord) -> Result<(), ApiError> {
        self.call(|respond_to| ApiCall::CreatePayment { record, respond_to }).await
    }

    async fn list_order_summaries(&self) -> Result<Vec<OrderSummary>, ApiError> {
        self.call(|respond_to| ApiCall::ListOrderSummaries { respond_to }).await
    }

    async fn list_user_orders(&self, user_id: String) -> Result<Vec<OrderSummary>, ApiError> {
        self.call(|respond_to| ApiCall::ListUserOrders { user_id, respond_to }).await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.call(|respond_to| ApiCall::ListUsers { respond_to }).await
    }

    async fn get_user(&self, id: String) -> Result<User, ApiError> {
        self.call(|respond_to| ApiCall::GetUser { id, respond_to }).await
    }

    async fn list_notifications(&self, user_id: String) -> Result<Vec<Notification>, ApiError> {
        self.call(|respond_to| ApiCall::ListNotifications { user_id, respond_to }).await
    }

    async fn mark_notifications_read(&self, user_id: String) -> Result<(), ApiError> {
        self.call(|respond_to| ApiCall::MarkNotificationsRead { user_id, respond_to }).await
    }

    async fn open_notification_stream(&self, user_id: String) -> Result<ByteStream, ApiError> {
        self.call(|respond_to| ApiCall::OpenNotificationStream { user_id, respond_to }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_api_round_trip() {
        let (api, mut calls) = create_mock_api();

        let task = tokio::spawn(async move { api.cancel_order("o1".to_string()).await });

        let ApiCall::CancelOrder { id, respond_to } = expect_call(&mut calls).await else {
            panic!("Expected CancelOrder");
        };
        assert_eq!(id, "o1");
        respond_to.send(Ok(())).unwrap();

        assert_eq!(task.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn dropped_responder_surfaces_as_transport_error() {
        let (api, mut calls) = create_mock_api();
        let task = tokio::spawn(async move { api.list_products().await });
        drop(expect_call(&mut calls).await);
        assert!(matches!(task.await.unwrap(), Err(ApiError::Transport(_))));
    }
}
