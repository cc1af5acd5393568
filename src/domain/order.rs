use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CartLine;

/// Lifecycle state of an order as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Success,
    Shipping,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Success => "SUCCESS",
            OrderStatus::Shipping => "SHIPPING",
            OrderStatus::Canceled => "CANCELED",
        }
    }

    /// Label shown next to an order in the history view.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Chờ xử lý",
            OrderStatus::Success => "Thành công",
            OrderStatus::Shipping => "Đang giao",
            OrderStatus::Canceled => "Đã hủy",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "SUCCESS" => Ok(OrderStatus::Success),
            "SHIPPING" => Ok(OrderStatus::Shipping),
            "CANCELED" | "CANCELLED" => Ok(OrderStatus::Canceled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    /// Paid online before shipping; checkout continues into the payment flow.
    #[default]
    Prepaid,
    /// Cash on delivery.
    Postpaid,
}

impl PaymentType {
    pub fn requires_prepayment(&self) -> bool {
        matches!(self, PaymentType::Prepaid)
    }
}

impl std::str::FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PREPAID" => Ok(PaymentType::Prepaid),
            "POSTPAID" => Ok(PaymentType::Postpaid),
            other => Err(format!("unknown payment type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: String,
    pub quantity: u32,
    pub price_at_time: f64,
}

impl From<&CartLine> for OrderLineItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.clone(),
            quantity: line.quantity,
            price_at_time: line.product.price,
        }
    }
}

/// Body of `POST /order/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub payment_type: PaymentType,
    pub address: String,
    pub list_item_detail: Vec<OrderLineItem>,
}

impl OrderRequest {
    pub fn from_cart(
        user_id: impl Into<String>,
        order_date: DateTime<Utc>,
        lines: &[CartLine],
        total_amount: f64,
        payment_type: PaymentType,
        address: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            order_date,
            status: OrderStatus::Pending,
            total_amount,
            payment_type,
            address: address.into(),
            list_item_detail: lines.iter().map(OrderLineItem::from).collect(),
        }
    }
}

/// The created order as echoed back by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemSummary {
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    pub price_at_time: f64,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Denormalized order view joining the order, buyer profile, payment and
/// line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub order_id: String,
    #[serde(default)]
    pub order_date: String,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub payment_time: Option<String>,
    #[serde(default)]
    pub status_stock: Option<String>,
    #[serde(default)]
    pub order_item_summaries: Vec<OrderItemSummary>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl OrderSummary {
    /// Calendar day of the order, read from the leading `YYYY-MM-DD` of
    /// `orderDate`.
    pub fn order_day(&self) -> Option<NaiveDate> {
        let prefix = self.order_date.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }

    /// Reconstructs the order request this summary was created from.
    pub fn to_order_request(&self) -> OrderRequest {
        let order_date = DateTime::parse_from_rfc3339(&self.order_date)
            .map(|date| date.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        let address = if self.shipping_address.is_empty() {
            self.address.clone()
        } else {
            self.shipping_address.clone()
        };
        OrderRequest {
            user_id: self.user_id.clone(),
            order_date,
            status: self.order_status,
            total_amount: self.total_amount,
            payment_type: self.payment_type,
            address,
            list_item_detail: self
                .order_item_summaries
                .iter()
                .map(|item| OrderLineItem {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                    price_at_time: item.price_at_time,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;

    #[test]
    fn order_request_uses_backend_field_names() {
        let lines = vec![CartLine::new(Product::new("p2", "Mouse", 50000.0, 3), 2)];
        let date = DateTime::parse_from_rfc3339("2026-10-15T08:00:00Z").unwrap().with_timezone(&Utc);
        let request = OrderRequest::from_cart("u1", date, &lines, 100000.0, PaymentType::Prepaid, "Thôn 4");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["userId"], "u1");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["paymentType"], "PREPAID");
        assert_eq!(json["totalAmount"], 100000.0);
        assert_eq!(json["listItemDetail"][0]["productId"], "p2");
        assert_eq!(json["listItemDetail"][0]["quantity"], 2);
        assert_eq!(json["listItemDetail"][0]["priceAtTime"], 50000.0);
    }

    #[test]
    fn summary_reports_order_day() {
        let summary: OrderSummary = serde_json::from_str(
            r#"{"id":"s1","orderId":"o1","orderDate":"2026-10-15T09:30:00Z","orderStatus":"SHIPPING"}"#,
        )
        .unwrap();
        assert_eq!(summary.order_day(), NaiveDate::from_ymd_opt(2026, 10, 15));
        assert_eq!(summary.order_status, OrderStatus::Shipping);
    }

    #[test]
    fn status_parsing_accepts_british_spelling() {
        assert_eq!("cancelled".parse::<OrderStatus>(), Ok(OrderStatus::Canceled));
        assert!("LOST".parse::<OrderStatus>().is_err());
    }
}
