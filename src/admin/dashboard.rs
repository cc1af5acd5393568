use chrono::{Datelike, NaiveDate};

use crate::domain::OrderSummary;

/// Headline numbers of the admin overview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub today_orders: usize,
    pub today_revenue: f64,
    pub month_orders: usize,
    pub month_revenue: f64,
}

impl DashboardStats {
    /// Orders with an unreadable date count toward neither period.
    pub fn compute(orders: &[OrderSummary], today: NaiveDate) -> Self {
        let mut stats = Self::default();
        for order in orders {
            let Some(day) = order.order_day() else {
                continue;
            };
            if day.year() == today.year() && day.month() == today.month() {
                stats.month_orders += 1;
                stats.month_revenue += order.total_amount;
                if day == today {
                    stats.today_orders += 1;
                    stats.today_revenue += order.total_amount;
                }
            }
        }
        stats
    }
}

/// Orders placed on `today`, in list order.
pub fn todays_orders(orders: &[OrderSummary], today: NaiveDate) -> Vec<&OrderSummary> {
    orders.iter().filter(|order| order.order_day() == Some(today)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, date: &str, total: f64) -> OrderSummary {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "orderId": id,
            "orderDate": date,
            "totalAmount": total,
        }))
        .unwrap()
    }

    #[test]
    fn test_today_and_month_totals() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let orders = vec![
            order("a", "2026-10-15T09:00:00Z", 100_000.0),
            order("b", "2026-10-15T18:30:00Z", 50_000.0),
            order("c", "2026-10-02T10:00:00Z", 20_000.0),
            order("d", "2026-09-15T10:00:00Z", 999_000.0),
            order("e", "2025-10-15T10:00:00Z", 999_000.0),
            order("f", "not a date", 1.0),
        ];

        let stats = DashboardStats::compute(&orders, today);
        assert_eq!(
            stats,
            DashboardStats {
                today_orders: 2,
                today_revenue: 150_000.0,
                month_orders: 3,
                month_revenue: 170_000.0,
            }
        );
        let ids: Vec<&str> = todays_orders(&orders, today).iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
