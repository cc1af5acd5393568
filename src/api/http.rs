use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::{ApiEnvelope, ApiError, AuthToken, ByteStream, Credentials, StoreApi};
use crate::config::StorefrontConfig;
use crate::domain::{
    Notification, OrderRequest, OrderResult, OrderStatus, OrderSummary, PaymentRecord, Product,
    ProductDraft, User,
};

/// HTTP client for the storefront backend.
pub struct HttpStoreApi {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    token: RwLock<Option<String>>,
}

impl HttpStoreApi {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, ApiError> {
        // No client-wide timeout: it would also cut the long-lived event stream.
        let client = reqwest::Client::builder()
            .connect_timeout(request_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            request_timeout,
            token: RwLock::new(None),
        })
    }

    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ApiError> {
        Self::new(config.api_base_url.clone(), config.request_timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn bearer(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.bearer() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
        timeout: Option<Duration>,
    ) -> Result<Response, ApiError> {
        let builder = match timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        let response = builder.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "Request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(endpoint, status = status.as_u16(), "Credentials rejected");
            return Err(ApiError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint, status = status.as_u16(), "Non-success response");
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        debug!(endpoint, status = status.as_u16(), "Response received");
        Ok(response)
    }

    async fn envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let response = self.send(builder, endpoint, Some(self.request_timeout)).await?;
        response.json::<ApiEnvelope<T>>().await.map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder, endpoint: &str) -> Result<T, ApiError> {
        self.envelope(builder, endpoint).await?.into_result(endpoint)
    }

    async fn execute(&self, builder: RequestBuilder, endpoint: &str) -> Result<(), ApiError> {
        self.send(builder, endpoint, Some(self.request_timeout)).await.map(|_| ())
    }
}

/// Multipart body shared by product create and update.
pub fn product_form(draft: ProductDraft) -> Result<Form, ApiError> {
    let form = Form::new()
        .text("name", draft.name)
        .text("description", draft.description)
        .text("type", draft.kind)
        .text("price", draft.price.to_string())
        .text("stockQuantity", draft.stock_quantity.to_string());

    match draft.image {
        Some(image) => {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.mime_type)
                .map_err(|e| ApiError::InvalidRequest(format!("image mime type: {}", e)))?;
            Ok(form.part("image", part))
        }
        None => Ok(form),
    }
}

#[async_trait]
impl StoreApi for HttpStoreApi {
    fn set_bearer_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut slot) => *slot = token,
            Err(_) => warn!("Token lock poisoned; bearer token unchanged"),
        }
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn login(&self, credentials: Credentials) -> Result<AuthToken, ApiError> {
        let endpoint = "identity/auth/token";
        let builder = self.client.post(self.url(endpoint)).json(&credentials);
        self.envelope::<AuthToken>(builder, endpoint).await?.into_checked_result(endpoint)
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let endpoint = "product/list";
        let products: Option<Vec<Product>> = self.envelope(self.request(Method::GET, endpoint), endpoint).await?.result;
        Ok(products.unwrap_or_default())
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create_product(&self, draft: ProductDraft) -> Result<(), ApiError> {
        let endpoint = "product/create";
        let form = product_form(draft)?;
        self.execute(self.request(Method::POST, endpoint).multipart(form), endpoint).await
    }

    #[instrument(skip(self, draft))]
    async fn update_product(&self, id: String, draft: ProductDraft) -> Result<(), ApiError> {
        let endpoint = format!("product/update-product/{}", id);
        let form = product_form(draft)?;
        self.execute(self.request(Method::PUT, &endpoint).multipart(form), &endpoint).await
    }

    #[instrument(skip(self, order), fields(user_id = %order.user_id, total = order.total_amount))]
    async fn create_order(&self, order: OrderRequest) -> Result<OrderResult, ApiError> {
        let endpoint = "order/create";
        self.fetch(self.request(Method::POST, endpoint).json(&order), endpoint).await
    }

    #[instrument(skip(self))]
    async fn update_order_status(&self, id: String, status: OrderStatus) -> Result<(), ApiError> {
        let endpoint = format!("order/update-status/{}", id);
        let builder = self.request(Method::PATCH, &endpoint).query(&[("status", status.as_str())]);
        self.execute(builder, &endpoint).await
    }

    #[instrument(skip(self))]
    async fn cancel_order(&self, id: String) -> Result<(), ApiError> {
        let endpoint = format!("order/cancel-order/{}", id);
        self.execute(self.request(Method::PATCH, &endpoint), &endpoint).await
    }

    #[instrument(skip(self, record), fields(order_id = %record.order_id, status = ?record.status))]
    async fn create_payment(&self, record: PaymentRecord) -> Result<(), ApiError> {
        let endpoint = "payment/create";
        self.execute(self.request(Method::POST, endpoint).json(&record), endpoint).await
    }

    #[instrument(skip(self))]
    async fn list_order_summaries(&self) -> Result<Vec<OrderSummary>, ApiError> {
        let endpoint = "customer-summary/get-all";
        let summaries: Option<Vec<OrderSummary>> =
            self.envelope(self.request(Method::GET, endpoint), endpoint).await?.result;
        Ok(summaries.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn list_user_orders(&self, user_id: String) -> Result<Vec<OrderSummary>, ApiError> {
        let endpoint = format!("customer-summary/get-list-order-user/{}", user_id);
        let summaries: Option<Vec<OrderSummary>> =
            self.envelope(self.request(Method::GET, &endpoint), &endpoint).await?.result;
        Ok(summaries.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let endpoint = "identity/users";
        let users: Option<Vec<User>> = self.envelope(self.request(Method::GET, endpoint), endpoint).await?.result;
        Ok(users.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: String) -> Result<User, ApiError> {
        let endpoint = format!("identity/users/{}", id);
        self.fetch(self.request(Method::GET, &endpoint), &endpoint).await
    }

    #[instrument(skip(self))]
    async fn list_notifications(&self, user_id: String) -> Result<Vec<Notification>, ApiError> {
        let endpoint = format!("notifications/get-notification-of-user/{}", user_id);
        let notifications: Option<Vec<Notification>> =
            self.envelope(self.request(Method::GET, &endpoint), &endpoint).await?.result;
        Ok(notifications.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn mark_notifications_read(&self, user_id: String) -> Result<(), ApiError> {
        let endpoint = format!("notifications/mark-read/{}", user_id);
        self.execute(self.request(Method::PATCH, &endpoint), &endpoint).await
    }

    #[instrument(skip(self))]
    async fn open_notification_stream(&self, user_id: String) -> Result<ByteStream, ApiError> {
        let endpoint = format!("notifications/stream/{}", user_id);
        let builder = self.request(Method::GET, &endpoint).header(ACCEPT, "text/event-stream");
        let response = self.send(builder, &endpoint, None).await?;
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| ApiError::Transport(e.to_string())))
            .boxed())
    }
}
