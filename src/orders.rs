use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, StoreApi};
use crate::domain::{OrderResult, OrderStatus, OrderSummary, PaymentContext};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderHistoryError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Order {order_id} is {status} and cannot be paid")]
    NotPayable { order_id: String, status: OrderStatus },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// One user's past orders.
pub struct OrderHistory {
    api: Arc<dyn StoreApi>,
    user_id: String,
    orders: Vec<OrderSummary>,
}

impl OrderHistory {
    pub fn new(api: Arc<dyn StoreApi>, user_id: impl Into<String>) -> Self {
        Self {
            api,
            user_id: user_id.into(),
            orders: Vec::new(),
        }
    }

    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn load(&mut self) -> Result<&[OrderSummary], OrderHistoryError> {
        self.orders = self.api.list_user_orders(self.user_id.clone()).await.map_err(|e| {
            warn!(error = %e, "Could not load order history");
            e
        })?;
        info!(count = self.orders.len(), "Order history loaded");
        Ok(&self.orders)
    }

    pub fn orders(&self) -> &[OrderSummary] {
        &self.orders
    }

    pub fn get(&self, order_id: &str) -> Option<&OrderSummary> {
        self.orders.iter().find(|order| order.order_id == order_id)
    }

    /// Cancels the order remotely; on success the local copy is marked
    /// canceled without refetching.
    #[instrument(skip(self))]
    pub async fn cancel(&mut self, order_id: &str) -> Result<(), OrderHistoryError> {
        if self.get(order_id).is_none() {
            return Err(OrderHistoryError::NotFound(order_id.to_string()));
        }
        self.api.cancel_order(order_id.to_string()).await.map_err(|e| {
            warn!(error = %e, "Cancel failed");
            e
        })?;
        if let Some(order) = self.orders.iter_mut().find(|order| order.order_id == order_id) {
            order.order_status = OrderStatus::Canceled;
        }
        info!("Order canceled");
        Ok(())
    }

    /// Builds the payment context for a pending order.
    pub fn pay_now(&self, order_id: &str) -> Result<PaymentContext, OrderHistoryError> {
        let order = self
            .get(order_id)
            .ok_or_else(|| OrderHistoryError::NotFound(order_id.to_string()))?;
        if order.order_status != OrderStatus::Pending {
            return Err(OrderHistoryError::NotPayable {
                order_id: order_id.to_string(),
                status: order.order_status,
            });
        }

        let order_data = order.to_order_request();
        let result = OrderResult {
            id: order.order_id.clone(),
            user_id: order.user_id.clone(),
            status: order.order_status,
            total_amount: order.total_amount,
            payment_type: order.payment_type,
            address: order_data.address.clone(),
        };
        let full_name = Some(order.full_name.clone()).filter(|name| !name.is_empty());
        Ok(PaymentContext {
            order_data,
            result,
            full_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderItemSummary;
    use crate::mock_framework::{create_mock_api, expect_call, ApiCall};

    fn summary(order_id: &str, status: OrderStatus) -> OrderSummary {
        serde_json::from_value(serde_json::json!({
            "id": format!("s-{order_id}"),
            "userId": "u1",
            "fullName": "Lê C",
            "orderId": order_id,
            "orderDate": "2026-10-15T08:30:00Z",
            "totalAmount": 150000.0,
            "paymentType": "PREPAID",
            "orderStatus": status.as_str(),
            "shippingAddress": "7 Trần Phú",
            "orderItemSummaries": [
                { "productId": "P1", "productName": "Rice", "priceAtTime": 75000.0, "quantity": 2 }
            ]
        }))
        .unwrap()
    }

    async fn loaded(statuses: &[(&str, OrderStatus)]) -> (OrderHistory, tokio::sync::mpsc::Receiver<ApiCall>) {
        let (api, mut calls) = create_mock_api();
        let orders: Vec<OrderSummary> = statuses.iter().map(|(id, status)| summary(id, *status)).collect();
        let responder = tokio::spawn(async move {
            if let ApiCall::ListUserOrders { user_id, respond_to } = expect_call(&mut calls).await {
                assert_eq!(user_id, "u1");
                respond_to.send(Ok(orders)).unwrap();
            }
            calls
        });
        let mut history = OrderHistory::new(api, "u1");
        history.load().await.unwrap();
        (history, responder.await.unwrap())
    }

    #[tokio::test]
    async fn test_load_and_pay_now_pending_only() {
        let (history, _calls) = loaded(&[("o1", OrderStatus::Pending), ("o2", OrderStatus::Success)]).await;
        assert_eq!(history.orders().len(), 2);

        let context = history.pay_now("o1").unwrap();
        assert_eq!(context.order_id(), "o1");
        assert_eq!(context.amount(), 150_000.0);
        assert_eq!(context.order_data.address, "7 Trần Phú");
        assert_eq!(context.order_data.list_item_detail.len(), 1);
        assert_eq!(context.full_name.as_deref(), Some("Lê C"));

        assert!(matches!(history.pay_now("o2"), Err(OrderHistoryError::NotPayable { .. })));
        assert!(matches!(history.pay_now("o9"), Err(OrderHistoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cancel_marks_local_copy() {
        let (mut history, mut calls) = loaded(&[("o1", OrderStatus::Pending)]).await;

        let responder = tokio::spawn(async move {
            if let ApiCall::CancelOrder { id, respond_to } = expect_call(&mut calls).await {
                assert_eq!(id, "o1");
                respond_to.send(Ok(())).unwrap();
            }
        });
        history.cancel("o1").await.unwrap();
        responder.await.unwrap();

        assert_eq!(history.get("o1").unwrap().order_status, OrderStatus::Canceled);
        assert!(matches!(history.pay_now("o1"), Err(OrderHistoryError::NotPayable { .. })));
    }

    #[tokio::test]
    async fn test_failed_cancel_keeps_status() {
        let (mut history, mut calls) = loaded(&[("o1", OrderStatus::Pending)]).await;

        tokio::spawn(async move {
            if let ApiCall::CancelOrder { respond_to, .. } = expect_call(&mut calls).await {
                respond_to.send(Err(ApiError::Status { status: 409, body: "shipped".to_string() })).unwrap();
            }
        });
        assert!(matches!(history.cancel("o1").await, Err(OrderHistoryError::Api(_))));
        assert_eq!(history.get("o1").unwrap().order_status, OrderStatus::Pending);
    }

    #[test]
    fn test_item_summary_fields() {
        let order = summary("o1", OrderStatus::Pending);
        let item: &OrderItemSummary = &order.order_item_summaries[0];
        assert_eq!(item.product_name, "Rice");
        assert_eq!(order.order_day().map(|d| d.to_string()).as_deref(), Some("2026-10-15"));
    }
}
