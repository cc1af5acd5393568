use chrono::{DateTime, Local, TimeZone};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{OrderRequest, OrderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Success,
    Failed,
}

/// Payment record sent to `POST /payment/create`. Built on the client; the
/// backend is the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub order_id: String,
    pub payment_method: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub payment_time: String,
}

pub const DEFAULT_PAYMENT_METHOD: &str = "VISA";

impl PaymentRecord {
    pub fn new<Tz: TimeZone>(
        order_id: impl Into<String>,
        amount: f64,
        status: PaymentStatus,
        at: DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let serial: u32 = rand::thread_rng().gen_range(0..1_000_000);
        Self {
            order_id: order_id.into(),
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            amount,
            status,
            transaction_id: format!("TXN_{}", serial),
            payment_time: format_payment_time(&at),
        }
    }

    pub fn now(order_id: impl Into<String>, amount: f64, status: PaymentStatus) -> Self {
        Self::new(order_id, amount, status, Local::now())
    }
}

/// `HH:MM:SS__DD/MM/YYYY`, the layout the payment service stores.
pub fn format_payment_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M:%S__%d/%m/%Y").to_string()
}

/// Order context handed from checkout (or order history) to the payment flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentContext {
    pub order_data: OrderRequest,
    pub result: OrderResult,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl PaymentContext {
    pub fn order_id(&self) -> &str {
        &self.result.id
    }

    pub fn amount(&self) -> f64 {
        self.order_data.total_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn record_carries_transaction_id_and_formatted_time() {
        let at = Utc.with_ymd_and_hms(2026, 10, 15, 14, 5, 9).unwrap();
        let record = PaymentRecord::new("o1", 100000.0, PaymentStatus::Success, at);

        assert_eq!(record.payment_method, "VISA");
        assert_eq!(record.payment_time, "14:05:09__15/10/2026");
        let serial: u32 = record.transaction_id.trim_start_matches("TXN_").parse().unwrap();
        assert!(serial < 1_000_000);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["orderId"], "o1");
        assert_eq!(json["status"], "SUCCESS");
    }
}
