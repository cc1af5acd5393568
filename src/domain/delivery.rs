use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    #[default]
    Processing,
    Shipped,
    InTransit,
    Delivered,
    Failed,
}

impl DeliveryState {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryState::Processing => "processing",
            DeliveryState::Shipped => "shipped",
            DeliveryState::InTransit => "in transit",
            DeliveryState::Delivered => "delivered",
            DeliveryState::Failed => "failed",
        }
    }
}

/// Shipment tracking record for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryStatus {
    pub id: String,
    pub order_id: u64,
    pub status: DeliveryState,
    #[serde(default)]
    pub tracking_number: String,
    #[serde(default)]
    pub shipping_date: String,
    /// Estimated or actual.
    #[serde(default)]
    pub delivery_date: String,
    #[serde(default)]
    pub current_position: String,
    #[serde(default)]
    pub address: String,
}

/// Form payload of the delivery editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryDraft {
    pub order_id: u64,
    pub tracking_number: String,
    pub status: DeliveryState,
    pub shipping_date: String,
    pub delivery_date: String,
    pub current_position: String,
    pub address: String,
}

impl From<&DeliveryStatus> for DeliveryDraft {
    fn from(status: &DeliveryStatus) -> Self {
        Self {
            order_id: status.order_id,
            tracking_number: status.tracking_number.clone(),
            status: status.status,
            shipping_date: status.shipping_date.clone(),
            delivery_date: status.delivery_date.clone(),
            current_position: status.current_position.clone(),
            address: status.address.clone(),
        }
    }
}

impl DeliveryStatus {
    pub fn from_draft(id: impl Into<String>, draft: DeliveryDraft) -> Self {
        Self {
            id: id.into(),
            order_id: draft.order_id,
            status: draft.status,
            tracking_number: draft.tracking_number,
            shipping_date: draft.shipping_date,
            delivery_date: draft.delivery_date,
            current_position: draft.current_position,
            address: draft.address,
        }
    }
}
